use thiserror::Error;

use outfit_shared::{AuthorityError, MessageError, RegistryError, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutfitClientError {
    #[error("Client is not connected to a server")]
    NotConnected,

    /// The server sent a packet that could not be read
    #[error("Malformed packet from server: {0}")]
    Message(#[from] MessageError),

    /// The server sent a message only clients may send
    #[error("Unexpected {message} message from server")]
    UnexpectedMessage {
        message: &'static str,
    },

    /// An update could not be applied or held
    #[error("Update failed: {0}")]
    Update(#[from] RegistryError),

    #[error("Sending to server failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Authority error: {0}")]
    Authority(#[from] AuthorityError),
}
