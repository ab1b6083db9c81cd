use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, warn};

use crate::{
    types::EntityKey,
    world::{
        error::RegistryError,
        property_key::PropertyKey,
        replicated_property::{PropertyHandle, SetOutcome},
    },
};

/// Default bound on updates held for properties that are not registered yet
pub const DEFAULT_MAX_WAITING_UPDATES: usize = 256;

struct RegistryData {
    properties: HashMap<PropertyKey, Arc<dyn PropertyHandle>>,
    // latest update per key that arrived before its property was registered
    waitlist: BTreeMap<PropertyKey, Vec<u8>>,
    max_waiting_updates: usize,
}

/// Routes incoming requests and updates to the bound properties of a peer.
///
/// Updates addressed to properties that are not registered yet wait here and
/// are applied as soon as the property is inserted. Clones share one registry.
#[derive(Clone)]
pub struct PropertyRegistry {
    data: Arc<RwLock<RegistryData>>,
}

impl PropertyRegistry {
    pub fn new(max_waiting_updates: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(RegistryData {
                properties: HashMap::new(),
                waitlist: BTreeMap::new(),
                max_waiting_updates,
            })),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryData>, RegistryError> {
        self.data.read().map_err(|_| RegistryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryData>, RegistryError> {
        self.data.write().map_err(|_| RegistryError::LockPoisoned)
    }

    fn handle(&self, key: &PropertyKey) -> Result<Option<Arc<dyn PropertyHandle>>, RegistryError> {
        Ok(self.read()?.properties.get(key).cloned())
    }

    /// Register a bound property, then apply any update that was waiting for it
    ///
    /// Returns an error if the key is already registered.
    pub fn insert(
        &self,
        key: PropertyKey,
        handle: Arc<dyn PropertyHandle>,
    ) -> Result<Option<SetOutcome>, RegistryError> {
        let pending = {
            let mut data = self.write()?;
            if data.properties.contains_key(&key) {
                return Err(RegistryError::AlreadyRegistered { key });
            }
            data.properties.insert(key, handle.clone());
            data.waitlist.remove(&key)
        };

        let Some(payload) = pending else {
            return Ok(None);
        };
        debug!("Applying waitlisted update for {}", key);
        Ok(Some(handle.apply_update(&payload)?))
    }

    /// Route a mirror's request to the authoritative property
    pub fn apply_request(&self, key: &PropertyKey, payload: &[u8]) -> Result<SetOutcome, RegistryError> {
        let Some(handle) = self.handle(key)? else {
            return Err(RegistryError::NotRegistered { key: *key });
        };
        Ok(handle.apply_request(payload)?)
    }

    /// Route an authority update to its mirror.
    ///
    /// Returns `None` when the property is not registered yet and the update
    /// was waitlisted.
    pub fn apply_update(
        &self,
        key: &PropertyKey,
        payload: &[u8],
    ) -> Result<Option<SetOutcome>, RegistryError> {
        if let Some(handle) = self.handle(key)? {
            return Ok(Some(handle.apply_update(payload)?));
        }

        let mut data = self.write()?;
        if !data.waitlist.contains_key(key) && data.waitlist.len() >= data.max_waiting_updates {
            warn!("Dropping update for {}, waitlist is full", key);
            return Err(RegistryError::WaitlistFull {
                key: *key,
                limit: data.max_waiting_updates,
            });
        }
        data.waitlist.insert(*key, payload.to_vec());
        Ok(None)
    }

    /// Unbind and forget one property. Returns whether it was registered.
    pub fn remove(&self, key: &PropertyKey) -> bool {
        let removed = match self.write() {
            Ok(mut data) => data.properties.remove(key),
            Err(err) => {
                warn!("Could not remove {}: {}", key, err);
                return false;
            }
        };
        match removed {
            Some(handle) => {
                handle.unbind();
                true
            }
            None => false,
        }
    }

    /// Unbind and forget every property of an entity, along with updates
    /// still waiting for it
    pub fn remove_entity(&self, entity: &EntityKey) -> usize {
        let removed: Vec<Arc<dyn PropertyHandle>> = match self.write() {
            Ok(mut data) => {
                data.waitlist.retain(|key, _| key.entity != *entity);
                let keys: Vec<PropertyKey> = data
                    .properties
                    .keys()
                    .filter(|key| key.entity == *entity)
                    .copied()
                    .collect();
                keys.iter()
                    .filter_map(|key| data.properties.remove(key))
                    .collect()
            }
            Err(err) => {
                warn!("Could not remove {}: {}", entity, err);
                return 0;
            }
        };

        for handle in &removed {
            handle.unbind();
        }
        removed.len()
    }

    /// Unbind and forget everything, used when the session ends
    pub fn clear(&self) {
        let removed: Vec<Arc<dyn PropertyHandle>> = match self.write() {
            Ok(mut data) => {
                data.waitlist.clear();
                data.properties.drain().map(|(_, handle)| handle).collect()
            }
            Err(err) => {
                warn!("Could not clear property registry: {}", err);
                return;
            }
        };
        for handle in removed {
            handle.unbind();
        }
    }

    /// Encoded value of every property holding a non-zero value, ordered by key
    pub fn snapshot(&self) -> Vec<(PropertyKey, Vec<u8>)> {
        let handles: Vec<(PropertyKey, Arc<dyn PropertyHandle>)> = match self.read() {
            Ok(data) => data
                .properties
                .iter()
                .map(|(key, handle)| (*key, handle.clone()))
                .collect(),
            Err(_) => return Vec::new(),
        };

        let mut snapshot: Vec<(PropertyKey, Vec<u8>)> = handles
            .into_iter()
            .filter_map(|(key, handle)| handle.snapshot().map(|payload| (key, payload)))
            .collect();
        snapshot.sort_by_key(|(key, _)| *key);
        snapshot
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.read()
            .map(|data| data.properties.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.read().map(|data| data.properties.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn waiting_updates(&self) -> usize {
        self.read().map(|data| data.waitlist.len()).unwrap_or(0)
    }
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WAITING_UPDATES)
    }
}
