//! Repository layer for database operations.

pub mod audit_log;
pub mod task;

pub use audit_log::AuditLogRepository;
pub use task::TaskRepository;
