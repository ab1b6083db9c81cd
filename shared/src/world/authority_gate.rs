use std::collections::{HashMap, HashSet};

use log::warn;

use crate::{
    types::{EntityKey, HostType},
    world::{
        authority::{AuthorityAccessor, AuthorityChannel, AuthorityMutator, AuthorityStatus},
        error::AuthorityError,
    },
};

/// One per peer session. Answers whether the local peer may write an entity's
/// properties directly, and whether it owns the entity's save.
pub struct AuthorityGate {
    host_type: HostType,
    auth_channels: HashMap<EntityKey, (AuthorityMutator, AuthorityAccessor)>,
    owned_entities: HashSet<EntityKey>,
}

impl AuthorityGate {
    pub fn new(host_type: HostType) -> Self {
        Self {
            host_type,
            auth_channels: HashMap::new(),
            owned_entities: HashSet::new(),
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    /// Register an entity with the gate
    ///
    /// # Panics
    ///
    /// Panics if the entity is already registered.
    /// Consider using `try_register_entity` for non-panicking error handling.
    pub fn register_entity(&mut self, entity: &EntityKey) -> AuthorityAccessor {
        self.try_register_entity(entity)
            .expect("Entity cannot register with the AuthorityGate more than once!")
    }

    /// Register an entity with the gate
    ///
    /// Returns an error if the entity is already registered.
    pub fn try_register_entity(
        &mut self,
        entity: &EntityKey,
    ) -> Result<AuthorityAccessor, AuthorityError> {
        if self.auth_channels.contains_key(entity) {
            return Err(AuthorityError::EntityAlreadyRegistered { entity: *entity });
        }

        let (mutator, accessor) = AuthorityChannel::new_channel(self.host_type);

        self.auth_channels
            .insert(*entity, (mutator, accessor.clone()));

        Ok(accessor)
    }

    /// Releases authority over the entity. Properties still holding its
    /// accessor drop any further writes.
    pub fn deregister_entity(&mut self, entity: &EntityKey) {
        self.owned_entities.remove(entity);
        let Some((mutator, _)) = self.auth_channels.remove(entity) else {
            return;
        };
        if let Err(err) = mutator.try_set_status(AuthorityStatus::Released) {
            warn!("Could not release authority over {}: {}", entity, err);
        }
    }

    /// Release every registered entity, used when the session ends
    pub fn deregister_all(&mut self) {
        let entities: Vec<EntityKey> = self.auth_channels.keys().copied().collect();
        for entity in entities {
            self.deregister_entity(&entity);
        }
    }

    pub fn is_registered(&self, entity: &EntityKey) -> bool {
        self.auth_channels.contains_key(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityKey> {
        self.auth_channels.keys()
    }

    /// Get the authority accessor for an entity
    ///
    /// # Panics
    ///
    /// Panics if the entity is not registered.
    /// Consider using `try_accessor` for non-panicking error handling.
    pub fn accessor(&self, entity: &EntityKey) -> AuthorityAccessor {
        self.try_accessor(entity)
            .expect("Entity must be registered with the AuthorityGate before binding properties!")
    }

    /// Get the authority accessor for an entity
    ///
    /// Returns an error if the entity is not registered.
    pub fn try_accessor(&self, entity: &EntityKey) -> Result<AuthorityAccessor, AuthorityError> {
        let (_, accessor) = self.auth_channels.get(entity).ok_or(
            AuthorityError::EntityNotRegistered {
                entity: *entity,
                operation: "get_accessor",
            },
        )?;

        Ok(accessor.clone())
    }

    pub fn status(&self, entity: &EntityKey) -> Option<AuthorityStatus> {
        let (_, accessor) = self.auth_channels.get(entity)?;
        accessor.try_status().ok()
    }

    /// Whether local writes to this entity apply directly
    pub fn has_authority(&self, entity: &EntityKey) -> bool {
        self.status(entity)
            .map(|status| status.has_authority())
            .unwrap_or(false)
    }

    /// Marks whether the local peer owns the entity's save
    pub fn try_set_owner(&mut self, entity: &EntityKey, owned: bool) -> Result<(), AuthorityError> {
        if !self.auth_channels.contains_key(entity) {
            return Err(AuthorityError::EntityNotRegistered {
                entity: *entity,
                operation: "set_owner",
            });
        }
        if owned {
            self.owned_entities.insert(*entity);
        } else {
            self.owned_entities.remove(entity);
        }
        Ok(())
    }

    /// Whether the local peer owns this entity's save
    pub fn is_owner(&self, entity: &EntityKey) -> bool {
        self.owned_entities.contains(entity)
    }
}
