//! SQLite-backed task backend.
//!
//! The local stand-in for a hosted relational backend: it owns the `tasks`
//! and `task_audit_logs` tables and broadcasts a [`ChangeEvent`] after every
//! successful mutation, which is what drives subscribed sync services to
//! refetch, including the service that issued the mutation.

use async_trait::async_trait;
use sea_orm::{ActiveValue, DbErr, IntoActiveModel};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    AuditAction, AuditEntry, AuditRecord, BackendError, ChangeEvent, ChangeKind, NewTask, Task,
    TaskBackend, TaskPatch, TaskPriority, TaskStatus,
};
use crate::entities::{audit_log, task};
use crate::repositories::{AuditLogRepository, TaskRepository};
use crate::storage::LocalStorage;
use crate::utils::datetime;

/// `TaskBackend` implementation over local SQLite storage.
pub struct LocalBackend {
    storage: LocalStorage,
    changes: broadcast::Sender<ChangeEvent>,
}

impl LocalBackend {
    pub fn new(storage: LocalStorage, channel_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(channel_capacity);
        Self { storage, changes }
    }

    fn notify(&self, kind: ChangeKind, task_id: Option<Uuid>) {
        // No receivers is fine; send only fails when nobody is listening.
        let _ = self.changes.send(ChangeEvent { kind, task_id });
    }
}

/// Translate a sea-orm error into the closed backend error taxonomy.
fn map_db_err(e: DbErr) -> BackendError {
    let message = e.to_string();
    if message.contains("no such table") {
        BackendError::TableMissing
    } else if message.contains("permission denied") || message.contains("readonly database") {
        BackendError::PermissionDenied
    } else {
        BackendError::Other(message)
    }
}

fn model_to_task(model: task::Model) -> Result<Task, BackendError> {
    let status = TaskStatus::parse(&model.status)
        .ok_or_else(|| BackendError::Other(format!("invalid task status: {}", model.status)))?;
    let priority = TaskPriority::parse(&model.priority)
        .ok_or_else(|| BackendError::Other(format!("invalid task priority: {}", model.priority)))?;

    Ok(Task {
        id: model.id,
        title: model.title,
        description: model.description,
        status,
        priority,
        date: model.date,
        deadline: model.deadline,
        reminder: model.reminder,
        position: model.position,
        project_id: model.project_id,
        created_at: model.created_at,
    })
}

fn audit_model_to_record(model: audit_log::Model) -> Result<AuditRecord, BackendError> {
    let action = AuditAction::parse(&model.action)
        .ok_or_else(|| BackendError::Other(format!("invalid audit action: {}", model.action)))?;

    let parse_snapshot = |data: Option<String>| -> Result<Option<serde_json::Value>, BackendError> {
        data.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| BackendError::Other(format!("corrupt audit snapshot: {e}")))
        })
        .transpose()
    };

    Ok(AuditRecord {
        id: model.id,
        task_id: model.task_id,
        action,
        previous: parse_snapshot(model.previous_data)?,
        new: parse_snapshot(model.new_data)?,
        actor: model.actor,
        created_at: model.created_at,
    })
}

fn snapshot_json(snapshot: Option<&Task>) -> Result<Option<String>, BackendError> {
    snapshot
        .map(|task| {
            serde_json::to_string(task)
                .map_err(|e| BackendError::Other(format!("failed to encode audit snapshot: {e}")))
        })
        .transpose()
}

#[async_trait]
impl TaskBackend for LocalBackend {
    fn backend_type(&self) -> &str {
        "local"
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, BackendError> {
        let models = TaskRepository::get_all(&self.storage.conn)
            .await
            .map_err(map_db_err)?;
        models.into_iter().map(model_to_task).collect()
    }

    async fn insert_task(&self, new: NewTask) -> Result<Task, BackendError> {
        let model = task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(new.title),
            description: ActiveValue::Set(new.description),
            status: ActiveValue::Set(new.status.as_str().to_string()),
            priority: ActiveValue::Set(new.priority.as_str().to_string()),
            date: ActiveValue::Set(new.date),
            deadline: ActiveValue::Set(new.deadline),
            reminder: ActiveValue::Set(new.reminder),
            position: ActiveValue::Set(new.position),
            project_id: ActiveValue::Set(new.project_id),
            created_at: ActiveValue::Set(datetime::now_timestamp()),
        };

        let stored = TaskRepository::insert(&self.storage.conn, model)
            .await
            .map_err(map_db_err)?;
        let stored = model_to_task(stored)?;

        self.notify(ChangeKind::Inserted, Some(stored.id));
        Ok(stored)
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, BackendError> {
        let existing = TaskRepository::get_by_id(&self.storage.conn, id)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| BackendError::Other(format!("task not found: {id}")))?;

        let mut model = existing.into_active_model();
        if let Some(title) = patch.title {
            model.title = ActiveValue::Set(title);
        }
        if let Some(description) = patch.description {
            model.description = ActiveValue::Set(Some(description));
        }
        if let Some(status) = patch.status {
            model.status = ActiveValue::Set(status.as_str().to_string());
        }
        if let Some(priority) = patch.priority {
            model.priority = ActiveValue::Set(priority.as_str().to_string());
        }
        if let Some(date) = patch.date {
            model.date = ActiveValue::Set(Some(date));
        }
        if let Some(deadline) = patch.deadline {
            model.deadline = ActiveValue::Set(Some(deadline));
        }
        if let Some(reminder) = patch.reminder {
            model.reminder = ActiveValue::Set(Some(reminder));
        }
        if let Some(position) = patch.position {
            model.position = ActiveValue::Set(Some(position));
        }
        if let Some(project_id) = patch.project_id {
            model.project_id = ActiveValue::Set(Some(project_id));
        }

        let updated = TaskRepository::update(&self.storage.conn, model)
            .await
            .map_err(map_db_err)?;
        let updated = model_to_task(updated)?;

        self.notify(ChangeKind::Updated, Some(id));
        Ok(updated)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), BackendError> {
        let removed = TaskRepository::delete_by_id(&self.storage.conn, id)
            .await
            .map_err(map_db_err)?;
        if removed == 0 {
            return Err(BackendError::Other(format!("task not found: {id}")));
        }

        self.notify(ChangeKind::Deleted, Some(id));
        Ok(())
    }

    async fn delete_all_tasks(&self) -> Result<u64, BackendError> {
        let removed = TaskRepository::delete_all(&self.storage.conn)
            .await
            .map_err(map_db_err)?;

        self.notify(ChangeKind::Deleted, None);
        Ok(removed)
    }

    async fn insert_audit_entry(&self, entry: AuditEntry) -> Result<(), BackendError> {
        let model = audit_log::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            task_id: ActiveValue::Set(entry.task_id),
            action: ActiveValue::Set(entry.action.as_str().to_string()),
            previous_data: ActiveValue::Set(snapshot_json(entry.previous.as_ref())?),
            new_data: ActiveValue::Set(snapshot_json(entry.new.as_ref())?),
            actor: ActiveValue::Set(entry.actor),
            created_at: ActiveValue::Set(datetime::now_timestamp()),
        };

        AuditLogRepository::insert(&self.storage.conn, model)
            .await
            .map_err(map_db_err)
    }

    async fn fetch_audit_entries(&self, task_id: Uuid) -> Result<Vec<AuditRecord>, BackendError> {
        let models = AuditLogRepository::get_for_task(&self.storage.conn, task_id)
            .await
            .map_err(map_db_err)?;
        models.into_iter().map(audit_model_to_record).collect()
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
