//! Taskdeck - task dashboard core with optimistic sync
//!
//! This library provides the data layer of a task-management dashboard:
//! a pluggable storage backend holding tasks and their audit log, and a
//! synchronization service that owns an in-memory copy of the collection,
//! applies optimistic mutations, and refetches on change notifications.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`backend`] - Storage backend trait, domain types, and error taxonomy
//! * [`config`] - Application configuration management
//! * [`storage`] - Local SQLite database
//! * [`sync`] - The task synchronization service, audit logging, and views
//! * [`utils`] - Utility functions and helpers

/// Backend abstraction layer and domain types
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging setup for diagnostics
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Local storage layer holding the task tables
pub mod storage;

/// Synchronization service owning the in-memory task collection
pub mod sync;

/// Utility functions for date/time handling
pub mod utils;

// Re-export the types most consumers need
pub use backend::{
    AuditAction, AuditEntry, AuditRecord, BackendError, ChangeEvent, ChangeKind, NewTask, Task,
    TaskBackend, TaskPatch, TaskPriority, TaskStatus,
};
pub use sync::TaskService;
