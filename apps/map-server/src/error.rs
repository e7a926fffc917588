use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced to the host application.
///
/// Per-subscriber delivery problems and browser disconnects never show up
/// here; they are logged and absorbed by the push layer.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("map server is already running on {0}")]
    AlreadyRunning(SocketAddr),

    #[error("failed to serialize command: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
