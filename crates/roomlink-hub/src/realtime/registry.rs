use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};

/// One session's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

/// Sessions attached to one endpoint, keyed by a hub-assigned id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<u64, Connection>,
    seq: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Register a connection and return its session id.
    pub fn insert(&self, conn: Connection) -> u64 {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        self.sessions.insert(id, conn);
        id
    }

    pub fn remove(&self, id: u64) -> Option<Connection> {
        self.sessions.remove(&id).map(|(_, c)| c)
    }

    pub fn get(&self, id: u64) -> Option<Connection> {
        self.sessions.get(&id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Lossy fan-out of one text frame.
    ///
    /// Full queues drop the frame for that session; closed queues evict the
    /// session. Returns how many sessions accepted the frame.
    pub fn broadcast(&self, text: &str) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        for entry in self.sessions.iter() {
            match entry.value().tx.try_send(Message::Text(text.to_owned())) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(session = *entry.key(), "outbound queue full, frame dropped");
                }
                Err(TrySendError::Closed(_)) => dead.push(*entry.key()),
            }
        }

        // removal happens after the iterator releases its shard locks
        for id in dead {
            self.sessions.remove(&id);
            tracing::debug!(session = id, "evicted closed session");
        }

        delivered
    }
}
