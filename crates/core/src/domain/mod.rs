// Domain Layer - Pure business logic and entities

pub mod audit;
pub mod entry;
pub mod error;
pub mod roster;

// Re-exports
pub use audit::{LogAction, LogRecord, Retention, DEFAULT_RETENTION_DAYS};
pub use entry::{render_queue, EntryId, QueueEntry, EMPTY_QUEUE};
pub use error::{DomainError, IndexError};
pub use roster::Roster;
