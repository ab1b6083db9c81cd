use thiserror::Error;

/// Errors that can occur while handing packets to a transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The remote end of the connection is gone
    #[error("Connection closed, packet of {length} bytes was not sent")]
    ConnectionClosed {
        length: usize,
    },

    /// The transport refused the packet for its own reasons
    #[error("Transport rejected packet: {reason}")]
    Rejected {
        reason: String,
    },
}
