//! Backend abstraction layer for task storage.
//!
//! This module defines the interface the sync service talks to, along with
//! the domain data types and the closed error taxonomy. A backend is the
//! system of record: it persists tasks and their audit log, and pushes change
//! notifications to subscribers whenever a row changes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

pub mod factory;
pub mod local;

/// Errors a backend can surface to callers.
///
/// The three named conditions carry the user-facing messages the dashboard
/// renders inline; everything else passes through as `Other`. Adapters
/// translate their vendor's wire errors into this enumeration so nothing
/// above the backend seam ever matches on vendor error codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Tasks table not found. Please run the database schema setup for your backend.")]
    TableMissing,

    #[error("Schema cache is stale. Please reload the backend schema cache and try again.")]
    SchemaCacheStale,

    #[error("Permission denied. Please check your row-level security policies.")]
    PermissionDenied,

    #[error("{0}")]
    Other(String),
}

/// Task state, a closed enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    Done,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
            TaskStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "backlog" => Some(TaskStatus::Backlog),
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            "canceled" => Some(TaskStatus::Canceled),
            _ => None,
        }
    }

    /// Whether a task in this status still shows up in date-driven views.
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Done | TaskStatus::Canceled)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority, a closed enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-agnostic task representation.
///
/// `id` is assigned by the backend at insert time and never changes.
/// `position`, when present, drives manual display ordering (ascending,
/// nulls first); ties fall back to newest-created first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub date: Option<String>,
    pub deadline: Option<String>,
    pub reminder: Option<String>,
    pub position: Option<i32>,
    pub project_id: Option<Uuid>,
    pub created_at: String,
}

/// Arguments for creating a new task. The id and creation timestamp are
/// assigned by the backend; the position is computed by the sync service.
#[derive(Clone, Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub date: Option<String>,
    pub deadline: Option<String>,
    pub reminder: Option<String>,
    pub position: Option<i32>,
    pub project_id: Option<Uuid>,
}

/// Partial task update. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub date: Option<String>,
    pub deadline: Option<String>,
    pub reminder: Option<String>,
    pub position: Option<i32>,
    pub project_id: Option<Uuid>,
}

impl TaskPatch {
    /// Merge this patch into a task, leaving unset fields alone.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(date) = &self.date {
            task.date = Some(date.clone());
        }
        if let Some(deadline) = &self.deadline {
            task.deadline = Some(deadline.clone());
        }
        if let Some(reminder) = &self.reminder {
            task.reminder = Some(reminder.clone());
        }
        if let Some(position) = self.position {
            task.position = Some(position);
        }
        if let Some(project_id) = self.project_id {
            task.project_id = Some(project_id);
        }
    }
}

/// Kind of audit log entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    StatusChanged,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::StatusChanged => "status_changed",
            AuditAction::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(AuditAction::Created),
            "updated" => Some(AuditAction::Updated),
            "status_changed" => Some(AuditAction::StatusChanged),
            "deleted" => Some(AuditAction::Deleted),
            _ => None,
        }
    }
}

/// Audit entry to be appended: before/after snapshots of one task mutation.
/// `previous` is `None` for creations, `new` is `None` for deletions.
#[derive(Clone, Debug)]
pub struct AuditEntry {
    pub task_id: Uuid,
    pub action: AuditAction,
    pub previous: Option<Task>,
    pub new: Option<Task>,
    pub actor: String,
}

/// Stored audit entry as read back from the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub task_id: Uuid,
    pub action: AuditAction,
    pub previous: Option<serde_json::Value>,
    pub new: Option<serde_json::Value>,
    pub actor: String,
    pub created_at: String,
}

/// What happened to the tasks collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// Change notification pushed to subscribers after a successful mutation.
/// `task_id` is `None` for bulk deletes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub task_id: Option<Uuid>,
}

/// Storage backend trait the sync service is written against.
///
/// Implementations persist tasks and audit entries and notify subscribers of
/// every successful mutation, including the caller's own. Constructed
/// explicitly and injected; there is no process-global handle.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Returns the backend type identifier (e.g., "local").
    fn backend_type(&self) -> &str;

    /// Fetch all tasks in display order: position ascending with nulls
    /// first, then creation time descending.
    async fn fetch_tasks(&self) -> Result<Vec<Task>, BackendError>;

    /// Insert a new task and return the stored row with its assigned id.
    async fn insert_task(&self, task: NewTask) -> Result<Task, BackendError>;

    /// Apply a partial update and return the updated row.
    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, BackendError>;

    /// Delete one task by id.
    async fn delete_task(&self, id: Uuid) -> Result<(), BackendError>;

    /// Delete every task. Returns the number of rows removed.
    async fn delete_all_tasks(&self) -> Result<u64, BackendError>;

    /// Append one audit entry.
    async fn insert_audit_entry(&self, entry: AuditEntry) -> Result<(), BackendError>;

    /// Read the audit trail for one task, newest first.
    async fn fetch_audit_entries(&self, task_id: Uuid) -> Result<Vec<AuditRecord>, BackendError>;

    /// Subscribe to the change-notification channel.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
