//! Real-time push layer: subscriber registry, fan-out, and per-subscriber
//! event streams.

pub mod fanout;
pub mod registry;
pub mod server;
pub mod stream;
