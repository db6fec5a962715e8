//! Local storage module for task persistence
//!
//! Owns the SQLite database (file-backed or in-memory) holding the `tasks`
//! and `task_audit_logs` tables, and creates the schema from the entity
//! definitions.

pub mod db;

pub use db::LocalStorage;
