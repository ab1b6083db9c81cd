use thiserror::Error;

use outfit_shared::{AuthorityError, EntityKey, MessageError, RegistryError, TransportError};

use crate::user::UserKey;

/// Errors surfaced by the Server, either returned or delivered as ErrorEvents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutfitServerError {
    /// Operation addressed a user that is not connected
    #[error("User {user} is not connected")]
    UserNotFound {
        user: UserKey,
    },

    /// Operation addressed an entity the server never spawned
    #[error("Entity {entity} does not exist")]
    EntityNotFound {
        entity: EntityKey,
    },

    /// A user sent a packet that could not be read
    #[error("Malformed packet from {user}: {source}")]
    Message {
        user: UserKey,
        #[source]
        source: MessageError,
    },

    /// A user sent a message only the server may send
    #[error("Unexpected {message} message from {user}")]
    UnexpectedMessage {
        user: UserKey,
        message: &'static str,
    },

    /// A request could not be applied
    #[error("Request from {user} failed: {source}")]
    Request {
        user: UserKey,
        #[source]
        source: RegistryError,
    },

    /// A packet could not be handed to a user's transport
    #[error("Sending to {user} failed: {source}")]
    Transport {
        user: UserKey,
        #[source]
        source: TransportError,
    },

    /// Entity authority bookkeeping failed
    #[error("Authority error: {0}")]
    Authority(#[from] AuthorityError),
}
