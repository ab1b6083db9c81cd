mod error;

pub use error::TransportError;

/// Outgoing half of a connection. Session establishment, relays and join
/// codes live behind this seam.
pub trait PacketSender: Send + Sync {
    /// Send a packet reliably and in order
    fn send(&self, payload: &[u8]) -> Result<(), TransportError>;
}
