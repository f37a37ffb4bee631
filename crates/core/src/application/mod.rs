// Application Layer - Use Cases and Business Logic

pub mod command;
pub mod queue_service;

// Re-exports
pub use command::{Command, CommandRouter};
pub use queue_service::QueueService;
