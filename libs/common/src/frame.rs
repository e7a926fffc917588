//! Frames emitted on a subscription stream, in `text/event-stream` framing.

use std::sync::Arc;

const PING_PAYLOAD: &str = r#"{"type":"ping"}"#;

/// One unit emitted to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// First frame on every stream; lets the browser learn its own ID.
    Connected { id: u64 },
    /// Sent when the queue stays silent for a full liveness interval.
    Ping,
    /// A serialized command, shared verbatim across subscribers.
    Message(Arc<str>),
}

impl StreamFrame {
    /// The JSON payload carried by this frame.
    pub fn payload(&self) -> String {
        match self {
            StreamFrame::Connected { id } => format!(r#"{{"type":"connected","id":{id}}}"#),
            StreamFrame::Ping => PING_PAYLOAD.to_string(),
            StreamFrame::Message(message) => message.to_string(),
        }
    }

    /// `data: <payload>\n\n`
    pub fn to_sse(&self) -> String {
        format!("data: {}\n\n", self.payload())
    }

    pub fn is_ping(&self) -> bool {
        matches!(self, StreamFrame::Ping)
    }
}
