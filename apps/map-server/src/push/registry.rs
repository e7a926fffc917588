//! Registry of connected subscribers and their delivery queues.

use std::sync::Arc;

use dashmap::DashMap;
use mapcast_common::ClientIdGenerator;
use tokio::sync::mpsc;

/// Producer half of a subscriber queue. Messages are serialized once and
/// shared between every queue they land in.
pub type ClientSender = mpsc::UnboundedSender<Arc<str>>;

/// Consumer half of a subscriber queue, owned by its subscription stream.
pub type ClientQueue = mpsc::UnboundedReceiver<Arc<str>>;

/// Shared registry of all live subscribers.
///
/// The map is the only structure touched by every stream lifecycle and by
/// broadcast. `DashMap` keeps each insert/remove/copy to a shard-level lock,
/// and nothing iterates it while delivering.
pub struct ClientRegistry {
    clients: DashMap<u64, ClientSender>,
    ids: ClientIdGenerator,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            ids: ClientIdGenerator::new(),
        }
    }

    /// Allocate a fresh ID and an empty queue, and insert the entry.
    pub fn register(&self) -> (u64, ClientQueue) {
        let id = self.ids.generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.insert(id, tx);
        (id, rx)
    }

    /// Remove an entry. Returns whether it was present; removing twice is fine.
    pub fn unregister(&self, id: u64) -> bool {
        self.clients.remove(&id).is_some()
    }

    /// Point-in-time copy of the live entries, ordered by ID.
    pub fn snapshot(&self) -> Vec<(u64, ClientSender)> {
        let mut entries: Vec<(u64, ClientSender)> = self
            .clients
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    pub fn contains(&self, id: u64) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Drop every queue sender so each stream sees its queue close.
    /// Returns the number of entries removed.
    pub fn close_all(&self) -> usize {
        let before = self.clients.len();
        self.clients.clear();
        before
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
