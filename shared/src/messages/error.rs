use thiserror::Error;

/// Errors that can occur while reading packets of replication messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Packet ended before its message count was read
    #[error("Packet of {length} bytes is too short to hold a message count")]
    MissingHeader {
        length: usize,
    },

    /// One of the packet's messages could not be decoded
    #[error("Malformed message at position {index} of {count} in packet")]
    MalformedMessage {
        index: u16,
        count: u16,
    },
}
