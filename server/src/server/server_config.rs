use std::default::Default;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Send every existing entity and every non-default property value to a
    /// user as soon as it connects
    pub snapshot_on_connect: bool,
    /// Despawn the entities a user owns when that user disconnects
    pub despawn_on_disconnect: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            snapshot_on_connect: true,
            despawn_on_disconnect: true,
        }
    }
}
