use std::{
    fmt::Debug,
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::debug;
use naia_serde::{BitReader, Serde, SerdeErr};

use crate::{
    messages::{
        outbox::Outbox,
        packet::{decode_value, encode_value, read_string, MAX_PAYLOAD_BYTES},
        replication_message::ReplicationMessage,
    },
    world::{
        authority::{AuthorityAccessor, AuthorityStatus},
        error::PropertyError,
        property_key::PropertyKey,
    },
};

/// Value types a ReplicatedProperty can carry
pub trait PropertyValue: Serde + Default + Debug + Send + Sync + 'static {
    /// Decode a value a peer sent. Types with length-prefixed fields
    /// override this to bound them.
    fn decode_payload(payload: &[u8]) -> Result<Self, SerdeErr> {
        decode_value(payload)
    }
}

impl PropertyValue for String {
    fn decode_payload(payload: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(payload);
        read_string(&mut reader, MAX_PAYLOAD_BYTES)
    }
}

impl PropertyValue for u32 {}

/// Where a property stands relative to its session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyState {
    Unbound,
    BoundNoAuthority,
    BoundAuthority,
}

/// What a write did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// Value changed locally, listeners fired
    Applied,
    /// Value already equal, nothing sent and nothing fired
    Unchanged,
    /// Request queued for the authority, local value untouched
    Requested,
    /// Entity left the session, write discarded
    Dropped,
}

/// Handle returned by [`ReplicatedProperty::on_change`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

type ChangeListener<T> = Box<dyn FnMut(&T, &T) + Send>;

type Validator<T> = Arc<dyn Fn(&T) -> Result<(), &'static str> + Send + Sync>;

#[derive(Clone)]
enum PropertyImpl {
    Unbound,
    Bound(BoundProperty),
}

impl PropertyImpl {
    fn name(&self) -> &str {
        match self {
            PropertyImpl::Unbound => "Unbound",
            PropertyImpl::Bound(_) => "Bound",
        }
    }
}

#[derive(Clone)]
struct BoundProperty {
    key: PropertyKey,
    accessor: AuthorityAccessor,
    outbox: Outbox,
}

struct PropertyData<T> {
    inner: PropertyImpl,
    value: T,
    validator: Option<Validator<T>>,
}

struct Listeners<T> {
    next_key: u64,
    entries: Vec<(ListenerKey, ChangeListener<T>)>,
    // taken out of `entries` while they run
    in_dispatch: Vec<ListenerKey>,
    removed_while_dispatching: Vec<ListenerKey>,
}

/// A value whose authoritative copy lives on one peer and is mirrored on all
/// others.
///
/// Writes on the authority apply locally and queue an `Update` for mirrors;
/// writes on a mirror queue a `Request` and leave the local value alone until
/// the authority's update comes back. Every peer fires `(old, new)`
/// notifications whenever its local value actually changes.
///
/// Clones share the same value, binding and listeners.
#[derive(Clone)]
pub struct ReplicatedProperty<T: PropertyValue> {
    data: Arc<RwLock<PropertyData<T>>>,
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T: PropertyValue> ReplicatedProperty<T> {
    pub fn new() -> Self {
        Self::with_value(T::default())
    }

    /// Create an Unbound property holding `value`
    pub fn with_value(value: T) -> Self {
        Self {
            data: Arc::new(RwLock::new(PropertyData {
                inner: PropertyImpl::Unbound,
                value,
                validator: None,
            })),
            listeners: Arc::new(Mutex::new(Listeners {
                next_key: 0,
                entries: Vec::new(),
                in_dispatch: Vec::new(),
                removed_while_dispatching: Vec::new(),
            })),
        }
    }

    fn read_data(&self) -> Result<RwLockReadGuard<'_, PropertyData<T>>, PropertyError> {
        self.data
            .read()
            .map_err(|_| PropertyError::LockPoisoned { key: None })
    }

    fn write_data(&self) -> Result<RwLockWriteGuard<'_, PropertyData<T>>, PropertyError> {
        self.data
            .write()
            .map_err(|_| PropertyError::LockPoisoned { key: None })
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Listeners<T>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bound(&self, operation: &'static str) -> Result<BoundProperty, PropertyError> {
        match &self.read_data()?.inner {
            PropertyImpl::Bound(bound) => Ok(bound.clone()),
            PropertyImpl::Unbound => Err(PropertyError::NotBound { operation }),
        }
    }

    // Binding

    /// Attach the property to a session under `key`
    ///
    /// Returns an error if the property is already bound.
    pub fn bind(
        &self,
        key: PropertyKey,
        accessor: AuthorityAccessor,
        outbox: &Outbox,
    ) -> Result<(), PropertyError> {
        let mut data = self.write_data()?;
        if let PropertyImpl::Bound(bound) = &data.inner {
            return Err(PropertyError::AlreadyBound { key: bound.key });
        }
        data.inner = PropertyImpl::Bound(BoundProperty {
            key,
            accessor,
            outbox: outbox.clone(),
        });
        Ok(())
    }

    /// Detach from the session. The last value stays readable.
    pub fn unbind(&self) {
        match self.write_data() {
            Ok(mut data) => data.inner = PropertyImpl::Unbound,
            Err(err) => debug!("Could not unbind property: {}", err),
        }
    }

    pub fn key(&self) -> Option<PropertyKey> {
        match &self.read_data().ok()?.inner {
            PropertyImpl::Bound(bound) => Some(bound.key),
            PropertyImpl::Unbound => None,
        }
    }

    /// Get the binding state (non-panicking version)
    pub fn try_state(&self) -> Result<PropertyState, PropertyError> {
        let data = self.read_data()?;
        let PropertyImpl::Bound(bound) = &data.inner else {
            return Ok(PropertyState::Unbound);
        };
        match bound.accessor.try_status()? {
            AuthorityStatus::Authority => Ok(PropertyState::BoundAuthority),
            AuthorityStatus::NoAuthority | AuthorityStatus::Released => {
                Ok(PropertyState::BoundNoAuthority)
            }
        }
    }

    /// Get the binding state (panicking version)
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    /// Consider using `try_state` for non-panicking error handling.
    pub fn state(&self) -> PropertyState {
        self.try_state()
            .expect("Lock on ReplicatedProperty is held by current thread.")
    }

    // Reading

    /// Get a copy of the local value (non-panicking version)
    pub fn try_get(&self) -> Result<T, PropertyError> {
        Ok(self.read_data()?.value.clone())
    }

    /// Get a copy of the local value (panicking version)
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_get` for non-panicking error handling.
    pub fn get(&self) -> T {
        self.try_get()
            .expect("Lock on ReplicatedProperty is held by current thread.")
    }

    /// Whether the local value differs from the type's zero value
    pub fn has_value(&self) -> bool {
        self.read_data()
            .map(|data| data.value != T::default())
            .unwrap_or(false)
    }

    // Writing

    /// Refuse values `validator` rejects, both in local writes and in
    /// requests from mirrors
    pub fn set_validator(
        &self,
        validator: impl Fn(&T) -> Result<(), &'static str> + Send + Sync + 'static,
    ) -> Result<(), PropertyError> {
        self.write_data()?.validator = Some(Arc::new(validator));
        Ok(())
    }

    fn validate(&self, value: &T) -> Result<(), PropertyError> {
        let validator = self.read_data()?.validator.clone();
        match validator {
            Some(validator) => {
                validator(value).map_err(|reason| PropertyError::InvalidValue { reason })
            }
            None => Ok(()),
        }
    }

    /// Write the property from this peer.
    ///
    /// Returns an error if the value is invalid or the property is not bound
    /// to a session.
    pub fn set(&self, value: T) -> Result<SetOutcome, PropertyError> {
        self.validate(&value)?;
        let bound = self.bound("set")?;
        match bound.accessor.try_status()? {
            AuthorityStatus::Authority => self.replace_value(value, Some(&bound)),
            AuthorityStatus::NoAuthority => {
                bound.outbox.push(ReplicationMessage::Request {
                    key: bound.key,
                    payload: encode_value(&value),
                });
                Ok(SetOutcome::Requested)
            }
            AuthorityStatus::Released => {
                debug!("Dropping write to {} after authority was released", bound.key);
                Ok(SetOutcome::Dropped)
            }
        }
    }

    /// Apply a mirror's request. Only the authority accepts requests.
    pub fn receive_request(&self, value: T) -> Result<SetOutcome, PropertyError> {
        let bound = self.bound("receive a request")?;
        match bound.accessor.try_status()? {
            AuthorityStatus::Authority => {
                self.validate(&value)?;
                self.replace_value(value, Some(&bound))
            }
            AuthorityStatus::NoAuthority => Err(PropertyError::WrongAuthority {
                key: bound.key,
                operation: "receive a request",
                status: AuthorityStatus::NoAuthority.name(),
            }),
            AuthorityStatus::Released => {
                debug!("Dropping request for {} after authority was released", bound.key);
                Ok(SetOutcome::Dropped)
            }
        }
    }

    /// Mirror the authority's value. The authority never accepts updates.
    pub fn receive_update(&self, value: T) -> Result<SetOutcome, PropertyError> {
        let bound = self.bound("receive an update")?;
        match bound.accessor.try_status()? {
            AuthorityStatus::NoAuthority => self.replace_value(value, None),
            AuthorityStatus::Authority => Err(PropertyError::WrongAuthority {
                key: bound.key,
                operation: "receive an update",
                status: AuthorityStatus::Authority.name(),
            }),
            AuthorityStatus::Released => {
                debug!("Dropping update for {} after authority was released", bound.key);
                Ok(SetOutcome::Dropped)
            }
        }
    }

    fn replace_value(
        &self,
        value: T,
        broadcast: Option<&BoundProperty>,
    ) -> Result<SetOutcome, PropertyError> {
        let old = {
            let mut data = self.write_data()?;
            if data.value == value {
                return Ok(SetOutcome::Unchanged);
            }
            mem::replace(&mut data.value, value.clone())
        };

        if let Some(bound) = broadcast {
            bound.outbox.push(ReplicationMessage::Update {
                key: bound.key,
                payload: encode_value(&value),
            });
        }

        // value lock is released, listeners may read the property
        self.notify(&old, &value);
        Ok(SetOutcome::Applied)
    }

    // Notifications

    /// Register a listener fired with `(old, new)` on every local change
    pub fn on_change(&self, listener: impl FnMut(&T, &T) + Send + 'static) -> ListenerKey {
        let mut listeners = self.lock_listeners();
        let key = ListenerKey(listeners.next_key);
        listeners.next_key += 1;
        listeners.entries.push((key, Box::new(listener)));
        key
    }

    /// Returns whether the listener was registered
    pub fn remove_listener(&self, key: ListenerKey) -> bool {
        let mut listeners = self.lock_listeners();
        if let Some(index) = listeners.entries.iter().position(|(k, _)| *k == key) {
            drop(listeners.entries.remove(index));
            return true;
        }
        if listeners.in_dispatch.contains(&key)
            && !listeners.removed_while_dispatching.contains(&key)
        {
            listeners.removed_while_dispatching.push(key);
            return true;
        }
        false
    }

    pub fn listener_count(&self) -> usize {
        let listeners = self.lock_listeners();
        listeners.entries.len() + listeners.in_dispatch.len()
            - listeners.removed_while_dispatching.len()
    }

    fn notify(&self, old: &T, new: &T) {
        let mut dispatching = {
            let mut listeners = self.lock_listeners();
            let taken = mem::take(&mut listeners.entries);
            listeners.in_dispatch.extend(taken.iter().map(|(key, _)| *key));
            taken
        };

        for (key, listener) in dispatching.iter_mut() {
            if self.lock_listeners().removed_while_dispatching.contains(key) {
                continue;
            }
            listener(old, new);
        }

        let mut guard = self.lock_listeners();
        let listeners = &mut *guard;
        let batch_start = listeners.in_dispatch.len() - dispatching.len();
        listeners.in_dispatch.truncate(batch_start);
        dispatching.retain(|(key, _)| !listeners.removed_while_dispatching.contains(key));
        // removals aimed at an outer dispatch stay queued for it
        let in_dispatch = &listeners.in_dispatch;
        listeners
            .removed_while_dispatching
            .retain(|key| in_dispatch.contains(key));
        let added = mem::replace(&mut listeners.entries, dispatching);
        listeners.entries.extend(added);
    }
}

impl<T: PropertyValue> Default for ReplicatedProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a bound property, as stored by the
/// [`PropertyRegistry`](crate::world::property_registry::PropertyRegistry)
pub trait PropertyHandle: Send + Sync {
    fn key(&self) -> Option<PropertyKey>;

    fn state(&self) -> Result<PropertyState, PropertyError>;

    fn apply_request(&self, payload: &[u8]) -> Result<SetOutcome, PropertyError>;

    fn apply_update(&self, payload: &[u8]) -> Result<SetOutcome, PropertyError>;

    /// Encoded value, or `None` while the value is still the zero value
    fn snapshot(&self) -> Option<Vec<u8>>;

    fn unbind(&self);
}

impl<T: PropertyValue> ReplicatedProperty<T> {
    fn decode(&self, payload: &[u8], operation: &'static str) -> Result<T, PropertyError> {
        let key = self.bound(operation)?.key;
        T::decode_payload(payload).map_err(|_| PropertyError::MalformedPayload { key })
    }
}

impl<T: PropertyValue> PropertyHandle for ReplicatedProperty<T> {
    fn key(&self) -> Option<PropertyKey> {
        ReplicatedProperty::key(self)
    }

    fn state(&self) -> Result<PropertyState, PropertyError> {
        self.try_state()
    }

    fn apply_request(&self, payload: &[u8]) -> Result<SetOutcome, PropertyError> {
        let value = self.decode(payload, "receive a request")?;
        self.receive_request(value)
    }

    fn apply_update(&self, payload: &[u8]) -> Result<SetOutcome, PropertyError> {
        let value = self.decode(payload, "receive an update")?;
        self.receive_update(value)
    }

    fn snapshot(&self) -> Option<Vec<u8>> {
        let data = self.read_data().ok()?;
        if data.value == T::default() {
            return None;
        }
        Some(encode_value(&data.value))
    }

    fn unbind(&self) {
        ReplicatedProperty::unbind(self)
    }
}

impl<T: PropertyValue> Debug for ReplicatedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.read_data() {
            Ok(data) => f
                .debug_struct("ReplicatedProperty")
                .field("state", &data.inner.name())
                .field("value", &data.value)
                .finish(),
            Err(_) => f.write_str("ReplicatedProperty(<poisoned>)"),
        }
    }
}
