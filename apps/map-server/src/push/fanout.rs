//! Fan-out of map commands to every registered subscriber queue.

use std::sync::Arc;

use mapcast_common::Command;

use crate::error::MapError;

use super::registry::ClientRegistry;

/// Outcome of a single broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers whose queue accepted the message.
    pub delivered: usize,
    /// Subscribers whose queue was already closed.
    pub failed: usize,
}

impl BroadcastReport {
    /// True when nobody was connected at the time of the call.
    pub fn no_clients(&self) -> bool {
        self.delivered == 0 && self.failed == 0
    }
}

/// Serializes commands once and pushes them onto every subscriber queue.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ClientRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize `command` and enqueue it for every live subscriber.
    pub fn broadcast(&self, command: &Command) -> Result<BroadcastReport, MapError> {
        let message: Arc<str> = Arc::from(serde_json::to_string(command)?);
        Ok(self.broadcast_raw(command.kind(), message))
    }

    /// Enqueue an already-serialized message. `kind` is only used for logging.
    pub fn broadcast_raw(&self, kind: &str, message: Arc<str>) -> BroadcastReport {
        let clients = self.registry.snapshot();
        if clients.is_empty() {
            tracing::info!(kind, "no connected clients to send message to");
            return BroadcastReport::default();
        }

        tracing::info!(kind, clients = clients.len(), "sending command to clients");

        let mut report = BroadcastReport::default();
        for (client_id, tx) in clients {
            // The stream may have closed between snapshot and send.
            match tx.send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(_) => {
                    tracing::warn!(client_id, kind, "error sending to client: queue closed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}
