pub mod audit_log;
pub mod task;

pub use audit_log::Entity as AuditLog;
pub use task::Entity as Task;
