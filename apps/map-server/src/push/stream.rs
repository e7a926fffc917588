//! Per-subscriber stream: drains one queue into one transport.
//!
//! ```text
//! CONNECTING ──register, emit "connected"──▶ ACTIVE ──emit failed / queue closed──▶ CLOSED
//!                                             │  ▲
//!                                             └──┘ message or ping
//! ```
//!
//! Closing unregisters the subscriber exactly once. Anything still queued at
//! that point is dropped with the queue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mapcast_common::StreamFrame;
use tokio::sync::mpsc;
use tokio::time;

use super::registry::{ClientQueue, ClientRegistry};

/// Default silence after which a ping is emitted.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

/// The consumer is gone; nothing more can be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportClosed;

/// Where a subscription stream writes its frames.
#[async_trait]
pub trait Transport: Send {
    async fn emit(&mut self, frame: &StreamFrame) -> Result<(), TransportClosed>;
}

/// Transport backed by a bounded channel feeding the HTTP response body.
///
/// The bound gives network backpressure: `emit` waits while the body is not
/// being read. The response dropping its receiver is how disconnects show up.
pub struct ChannelTransport {
    tx: mpsc::Sender<String>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn emit(&mut self, frame: &StreamFrame) -> Result<(), TransportClosed> {
        self.tx.send(frame.to_sse()).await.map_err(|_| TransportClosed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Active,
    Closed,
}

/// Why a stream reached `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The transport refused a frame.
    Disconnected,
    /// The registry dropped the queue sender (server shutdown).
    QueueClosed,
}

/// One subscriber's lifecycle.
pub struct SubscriptionStream {
    id: u64,
    queue: ClientQueue,
    registry: Arc<ClientRegistry>,
    ping_interval: Duration,
    state: StreamState,
}

impl SubscriptionStream {
    /// Enter `Connecting`: register with the registry and take ownership of
    /// the new queue.
    pub fn connect(registry: Arc<ClientRegistry>, ping_interval: Duration) -> Self {
        let (id, queue) = registry.register();
        tracing::info!(client_id = id, clients = registry.len(), "client connected");
        Self {
            id,
            queue,
            registry,
            ping_interval,
            state: StreamState::Connecting,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Drive the stream until it closes.
    pub async fn run<T: Transport>(mut self, transport: &mut T) -> CloseReason {
        let reason = self.drive(transport).await;
        self.close(reason);
        reason
    }

    async fn drive<T: Transport>(&mut self, transport: &mut T) -> CloseReason {
        let connected = StreamFrame::Connected { id: self.id };
        if transport.emit(&connected).await.is_err() {
            return CloseReason::Disconnected;
        }
        self.state = StreamState::Active;

        loop {
            let frame = match self.next_frame().await {
                Some(frame) => frame,
                None => return CloseReason::QueueClosed,
            };
            if transport.emit(&frame).await.is_err() {
                return CloseReason::Disconnected;
            }
        }
    }

    /// Wait up to one ping interval for the next queued message.
    /// Returns `None` once the queue has been closed.
    async fn next_frame(&mut self) -> Option<StreamFrame> {
        match time::timeout(self.ping_interval, self.queue.recv()).await {
            Ok(Some(message)) => Some(StreamFrame::Message(message)),
            Ok(None) => None,
            Err(_elapsed) => Some(StreamFrame::Ping),
        }
    }

    fn close(&mut self, reason: CloseReason) {
        if self.state == StreamState::Closed {
            return;
        }
        self.state = StreamState::Closed;
        self.queue.close();
        self.registry.unregister(self.id);
        tracing::info!(
            client_id = self.id,
            ?reason,
            remaining = self.registry.len(),
            "client disconnected"
        );
    }
}

impl Drop for SubscriptionStream {
    fn drop(&mut self) {
        // Covers a task aborted mid-await (runtime shutdown).
        self.close(CloseReason::Disconnected);
    }
}
