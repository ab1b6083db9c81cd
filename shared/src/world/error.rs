use thiserror::Error;

use crate::{types::EntityKey, world::property_key::PropertyKey};

/// Errors that can occur while tracking authority over entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    /// The lock guarding an entity's authority status was poisoned
    #[error("Lock on authority status was poisoned by a panicking thread")]
    AuthLockPoisoned,

    /// Entity registered with the gate more than once
    #[error("Entity {entity} is already registered with the authority gate")]
    EntityAlreadyRegistered {
        entity: EntityKey,
    },

    /// Entity must be registered before the requested operation
    #[error("Entity {entity} is not registered with the authority gate, cannot {operation}")]
    EntityNotRegistered {
        entity: EntityKey,
        operation: &'static str,
    },
}

/// Errors that can occur during ReplicatedProperty operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Property must be bound to a session before the requested operation
    #[error("Property is not bound to a session, cannot {operation}")]
    NotBound {
        operation: &'static str,
    },

    /// Property was bound a second time without being unbound
    #[error("Property is already bound as {key}")]
    AlreadyBound {
        key: PropertyKey,
    },

    /// The lock guarding the property value was poisoned
    #[error("Lock on property {key:?} was poisoned by a panicking thread")]
    LockPoisoned {
        key: Option<PropertyKey>,
    },

    /// Operation reserved for the other side of the authority split
    #[error("Property {key} cannot {operation} while its authority is {status}")]
    WrongAuthority {
        key: PropertyKey,
        operation: &'static str,
        status: &'static str,
    },

    /// Incoming payload did not decode as the property's value type
    #[error("Malformed payload for property {key}")]
    MalformedPayload {
        key: PropertyKey,
    },

    /// Value refused by the property's validator, locally or in a request
    #[error("Invalid value: {reason}")]
    InvalidValue {
        reason: &'static str,
    },

    /// Authority status could not be read
    #[error("Authority error: {0}")]
    Authority(#[from] AuthorityError),
}

/// Errors that can occur while routing messages to registered properties
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry lock was poisoned
    #[error("Lock on property registry was poisoned by a panicking thread")]
    LockPoisoned,

    /// Two properties registered under the same key
    #[error("Property {key} is already registered")]
    AlreadyRegistered {
        key: PropertyKey,
    },

    /// Request addressed to a property that does not exist on this peer
    #[error("Property {key} is not registered")]
    NotRegistered {
        key: PropertyKey,
    },

    /// Too many updates are waiting for their properties to be registered
    #[error("Update for {key} dropped, {limit} updates are already waiting for registration")]
    WaitlistFull {
        key: PropertyKey,
        limit: usize,
    },

    /// The property refused the message
    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    /// Binding a slot needed an authority accessor
    #[error("Authority error: {0}")]
    Authority(#[from] AuthorityError),
}
