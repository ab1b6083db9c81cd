use outfit_shared::DEFAULT_MAX_WAITING_UPDATES;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Updates that arrive before their property is bound are held until
    /// the binding appears. Beyond this many, further updates are rejected.
    pub max_waiting_updates: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_waiting_updates: DEFAULT_MAX_WAITING_UPDATES,
        }
    }
}
