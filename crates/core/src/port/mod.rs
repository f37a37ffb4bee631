// Port Layer - Interfaces for external dependencies

pub mod audit_log;
pub mod entry_store;
pub mod id_provider; // For deterministic testing
pub mod time_provider;

// Re-exports
pub use audit_log::AuditLog;
pub use entry_store::EntryStore;
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
