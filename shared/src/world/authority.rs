use std::sync::{Arc, RwLock};

use crate::{types::HostType, world::error::AuthorityError};

/// Write permission of the local peer over one entity's properties
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthorityStatus {
    /// Local writes apply directly and are broadcast
    Authority,
    /// Local writes become requests to the authority
    NoAuthority,
    /// Entity left the session, writes are dropped
    Released,
}

impl AuthorityStatus {
    fn initial(host_type: HostType) -> Self {
        match host_type {
            HostType::Server => AuthorityStatus::Authority,
            HostType::Client => AuthorityStatus::NoAuthority,
        }
    }

    pub fn has_authority(&self) -> bool {
        *self == AuthorityStatus::Authority
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuthorityStatus::Authority => "Authority",
            AuthorityStatus::NoAuthority => "NoAuthority",
            AuthorityStatus::Released => "Released",
        }
    }
}

// AuthorityChannel
#[derive(Clone)]
pub(crate) struct AuthorityChannel {
    data: Arc<RwLock<AuthorityData>>,
}

impl AuthorityChannel {
    pub(crate) fn new_channel(host_type: HostType) -> (AuthorityMutator, AuthorityAccessor) {
        let channel = Self {
            data: Arc::new(RwLock::new(AuthorityData::new(host_type))),
        };

        let mutator = AuthorityMutator::new(&channel);
        let accessor = AuthorityAccessor::new(&channel);

        (mutator, accessor)
    }

    fn try_status(&self) -> Result<AuthorityStatus, AuthorityError> {
        let data = self
            .data
            .as_ref()
            .read()
            .map_err(|_| AuthorityError::AuthLockPoisoned)?;
        Ok(data.status)
    }

    fn try_set_status(&self, status: AuthorityStatus) -> Result<(), AuthorityError> {
        let mut data = self
            .data
            .as_ref()
            .write()
            .map_err(|_| AuthorityError::AuthLockPoisoned)?;
        data.status = status;
        Ok(())
    }

    fn host_type(&self) -> Result<HostType, AuthorityError> {
        let data = self
            .data
            .as_ref()
            .read()
            .map_err(|_| AuthorityError::AuthLockPoisoned)?;
        Ok(data.host_type)
    }
}

// AuthorityData
struct AuthorityData {
    host_type: HostType,
    status: AuthorityStatus,
}

impl AuthorityData {
    fn new(host_type: HostType) -> Self {
        Self {
            host_type,
            status: AuthorityStatus::initial(host_type),
        }
    }
}

// AuthorityAccessor
/// Read side of an entity's authority status, held by every bound property
#[derive(Clone)]
pub struct AuthorityAccessor {
    channel: AuthorityChannel,
}

impl AuthorityAccessor {
    fn new(channel: &AuthorityChannel) -> Self {
        Self {
            channel: channel.clone(),
        }
    }

    /// Get the authority status (panicking version)
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    /// Consider using `try_status` for non-panicking error handling.
    pub fn status(&self) -> AuthorityStatus {
        self.try_status()
            .expect("Lock on AuthorityStatus is held by current thread.")
    }

    /// Get the authority status (non-panicking version)
    ///
    /// Returns an error if the lock is poisoned.
    pub fn try_status(&self) -> Result<AuthorityStatus, AuthorityError> {
        self.channel.try_status()
    }

    pub fn try_host_type(&self) -> Result<HostType, AuthorityError> {
        self.channel.host_type()
    }
}

// AuthorityMutator
// no Clone necessary
pub(crate) struct AuthorityMutator {
    channel: AuthorityChannel,
}

impl AuthorityMutator {
    fn new(channel: &AuthorityChannel) -> Self {
        Self {
            channel: channel.clone(),
        }
    }

    pub(crate) fn try_set_status(&self, status: AuthorityStatus) -> Result<(), AuthorityError> {
        self.channel.try_set_status(status)
    }
}
