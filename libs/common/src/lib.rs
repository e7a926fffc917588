pub mod command;
pub mod frame;
pub mod id;

pub use command::Command;
pub use frame::StreamFrame;
pub use id::ClientIdGenerator;
