/// In-memory transport for E2E testing
/// Routes packets between server and client without network I/O

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use outfit_shared::{PacketSender, TransportError};

type PacketQueue = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// Pair of connected server and client endpoints for E2E testing
pub struct LocalSocketPair {
    /// Server -> client
    pub server_sender: LocalSender,
    /// Client -> server, read by the server
    pub server_receiver: LocalReceiver,
    /// Client -> server
    pub client_sender: LocalSender,
    /// Server -> client, read by the client
    pub client_receiver: LocalReceiver,
    connected: Arc<AtomicBool>,
}

impl LocalSocketPair {
    pub fn new() -> Self {
        let server_to_client_queue: PacketQueue = Arc::new(Mutex::new(VecDeque::new()));
        let client_to_server_queue: PacketQueue = Arc::new(Mutex::new(VecDeque::new()));
        let connected = Arc::new(AtomicBool::new(true));

        Self {
            server_sender: LocalSender {
                queue: server_to_client_queue.clone(),
                connected: connected.clone(),
            },
            server_receiver: LocalReceiver {
                queue: client_to_server_queue.clone(),
            },
            client_sender: LocalSender {
                queue: client_to_server_queue,
                connected: connected.clone(),
            },
            client_receiver: LocalReceiver {
                queue: server_to_client_queue,
            },
            connected,
        }
    }

    /// A handle that can later cut both directions of this pair
    pub fn link(&self) -> LocalLink {
        LocalLink {
            connected: self.connected.clone(),
        }
    }
}

impl Default for LocalSocketPair {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct LocalLink {
    connected: Arc<AtomicBool>,
}

impl LocalLink {
    pub fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct LocalSender {
    queue: PacketQueue,
    connected: Arc<AtomicBool>,
}

impl PacketSender for LocalSender {
    fn send(&self, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed {
                length: payload.len(),
            });
        }

        let mut queue = self.queue.lock().unwrap();
        queue.push_back(payload.to_vec());
        Ok(())
    }
}

#[derive(Clone)]
pub struct LocalReceiver {
    queue: PacketQueue,
}

impl LocalReceiver {
    pub fn receive(&self) -> Option<Vec<u8>> {
        self.queue.lock().unwrap().pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}
