use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::messages::replication_message::ReplicationMessage;

/// Queue of messages produced by local property writes, drained by the
/// session when it flushes to the network. Clones share one queue.
#[derive(Clone, Default)]
pub struct Outbox {
    queue: Arc<Mutex<VecDeque<ReplicationMessage>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    // poisoning is ignored, the queue only ever holds whole messages
    fn lock(&self) -> MutexGuard<'_, VecDeque<ReplicationMessage>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, message: ReplicationMessage) {
        self.lock().push_back(message);
    }

    pub fn drain(&self) -> Vec<ReplicationMessage> {
        self.lock().drain(..).collect()
    }

    /// Drops queued messages matching the predicate
    pub fn discard_where(&self, predicate: impl Fn(&ReplicationMessage) -> bool) -> usize {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|message| !predicate(message));
        before - queue.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
