//! Synchronization service module.
//!
//! This module provides the [`TaskService`] struct, the data layer the
//! dashboard reads from. It owns an in-memory copy of the task collection,
//! applies mutations optimistically before the backend confirms them, and
//! converges with other clients by refetching the whole collection whenever
//! the backend's change-notification channel fires.
//!
//! The service offers:
//! - Fast in-memory reads for the dashboard views
//! - Optimistic create/update/delete with refetch-on-failure
//! - Best-effort audit logging of every successful mutation
//! - A background listener that reloads on remote changes

pub mod audit;
pub mod views;

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::backend::{AuditAction, AuditEntry, BackendError, NewTask, Task, TaskBackend, TaskPatch};
use crate::config::Config;

/// Shared state of the in-memory task collection.
///
/// Initial state is loading with an empty collection; after that the state is
/// either populated, or carrying the last fetch error.
#[derive(Debug, Default)]
struct TaskListState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<BackendError>,
}

/// Service that synchronizes the in-memory task collection with a backend.
///
/// The service owns the collection for its lifetime; the backend is the
/// system of record. Mutations are applied locally first and reverted by a
/// full refetch when the backend rejects them. Overlapping mutations are not
/// serialized: the last writer wins, and the subscription refetch converges
/// everyone afterwards.
#[derive(Clone)]
pub struct TaskService {
    backend: Arc<dyn TaskBackend>,
    state: Arc<Mutex<TaskListState>>,
    refresh_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
    actor: String,
    audit_enabled: bool,
    auto_refresh: bool,
}

impl TaskService {
    /// Create a service over an injected backend.
    ///
    /// The collection starts empty in the loading state; call [`start`] (or
    /// [`fetch`] directly) to populate it.
    ///
    /// [`start`]: TaskService::start
    /// [`fetch`]: TaskService::fetch
    pub fn new(backend: Arc<dyn TaskBackend>, config: &Config) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(TaskListState {
                tasks: Vec::new(),
                loading: true,
                error: None,
            })),
            refresh_handle: Arc::new(Mutex::new(None)),
            actor: config.audit.actor.clone(),
            audit_enabled: config.audit.enabled,
            auto_refresh: config.sync.auto_refresh,
        }
    }

    /// Perform the initial fetch and, when auto-refresh is configured, spawn
    /// the change-notification listener.
    pub async fn start(&self) {
        // Subscribe before the initial fetch so no change slips between them.
        if self.auto_refresh {
            self.spawn_refresh_listener().await;
        }
        self.fetch().await;
    }

    /// Stop the change-notification listener, if running.
    pub async fn stop(&self) {
        if let Some(handle) = self.refresh_handle.lock().await.take() {
            handle.abort();
        }
    }

    async fn spawn_refresh_listener(&self) {
        let mut guard = self.refresh_handle.lock().await;
        if guard.is_some() {
            return;
        }

        let mut rx = self.backend.subscribe();
        let service = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        info!("change notification received: {event:?}, refetching");
                        service.fetch().await;
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // A refetch reloads everything, so missed events
                        // only cost us this one extra reload.
                        warn!("change channel lagged, {missed} events missed");
                        service.fetch().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        *guard = Some(handle);
    }

    /// Retrieve all tasks from the backend and replace the in-memory
    /// collection.
    ///
    /// On success the stored error is cleared; on failure the error is
    /// stored for the presentation layer to render inline, and the previous
    /// collection is left in place. Loading ends false either way.
    pub async fn fetch(&self) {
        {
            let mut state = self.state.lock().await;
            state.loading = true;
        }

        match self.backend.fetch_tasks().await {
            Ok(tasks) => {
                let mut state = self.state.lock().await;
                state.tasks = tasks;
                state.error = None;
                state.loading = false;
            }
            Err(e) => {
                error!("failed to fetch tasks: {e}");
                let mut state = self.state.lock().await;
                state.error = Some(e);
                state.loading = false;
            }
        }
    }

    /// Current in-memory task collection.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    /// Whether a fetch is in flight.
    pub async fn loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Last fetch error, if the collection could not be loaded.
    pub async fn error(&self) -> Option<BackendError> {
        self.state.lock().await.error.clone()
    }

    /// Create a task.
    ///
    /// The position is computed client-side as one more than the current
    /// maximum (zero when no task holds a position). On success the stored
    /// row is prepended to the collection and a "created" audit entry is
    /// recorded; on failure local state is untouched and the error
    /// propagates to the caller.
    pub async fn create_task(&self, mut new: NewTask) -> Result<Task> {
        let next_position = {
            let state = self.state.lock().await;
            state
                .tasks
                .iter()
                .filter_map(|t| t.position)
                .max()
                .map_or(0, |max| max + 1)
        };
        new.position = Some(next_position);

        let created = self.backend.insert_task(new).await?;

        {
            let mut state = self.state.lock().await;
            state.tasks.insert(0, created.clone());
        }

        self.record_audit(AuditEntry {
            task_id: created.id,
            action: AuditAction::Created,
            previous: None,
            new: Some(created.clone()),
            actor: self.actor.clone(),
        })
        .await;

        Ok(created)
    }

    /// Apply a partial update to a task.
    ///
    /// The patch is merged into the local record immediately; when the
    /// backend rejects it, the optimistic change is discarded by a full
    /// refetch and the error propagates. On success the audit entry is
    /// classified as "status_changed" when status is the sole attribute
    /// that differs, "updated" otherwise.
    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let previous = {
            let mut state = self.state.lock().await;
            match state.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => {
                    let before = task.clone();
                    patch.apply_to(task);
                    Some(before)
                }
                None => None,
            }
        };

        match self.backend.update_task(id, patch).await {
            Ok(updated) => {
                {
                    let mut state = self.state.lock().await;
                    if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
                        *task = updated.clone();
                    }
                }

                let action = audit::classify_update(previous.as_ref(), &updated);
                self.record_audit(AuditEntry {
                    task_id: id,
                    action,
                    previous,
                    new: Some(updated.clone()),
                    actor: self.actor.clone(),
                })
                .await;

                Ok(updated)
            }
            Err(e) => {
                self.fetch().await;
                Err(e.into())
            }
        }
    }

    /// Delete a task by id.
    ///
    /// The record is removed locally first; when the backend rejects the
    /// delete, the collection is restored by a full refetch and the error
    /// propagates. On success a "deleted" audit entry is recorded.
    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        let removed = {
            let mut state = self.state.lock().await;
            state
                .tasks
                .iter()
                .position(|t| t.id == id)
                .map(|index| state.tasks.remove(index))
        };

        match self.backend.delete_task(id).await {
            Ok(()) => {
                self.record_audit(AuditEntry {
                    task_id: id,
                    action: AuditAction::Deleted,
                    previous: removed,
                    new: None,
                    actor: self.actor.clone(),
                })
                .await;
                Ok(())
            }
            Err(e) => {
                self.fetch().await;
                Err(e.into())
            }
        }
    }

    /// Delete every task. Returns how many tasks the collection held.
    ///
    /// The collection is cleared locally first, then an unconditional delete
    /// runs against the backend. On success one "deleted" audit entry is
    /// recorded per previously held task, concurrently and best-effort.
    pub async fn delete_all_tasks(&self) -> Result<usize> {
        let removed = {
            let mut state = self.state.lock().await;
            std::mem::take(&mut state.tasks)
        };
        let count = removed.len();

        match self.backend.delete_all_tasks().await {
            Ok(_rows) => {
                let mut writes = Vec::with_capacity(count);
                for task in removed {
                    let service = self.clone();
                    writes.push(tokio::spawn(async move {
                        service
                            .record_audit(AuditEntry {
                                task_id: task.id,
                                action: AuditAction::Deleted,
                                previous: Some(task),
                                new: None,
                                actor: service.actor.clone(),
                            })
                            .await;
                    }));
                }
                for write in writes {
                    let _ = write.await;
                }
                Ok(count)
            }
            Err(e) => {
                self.fetch().await;
                Err(e.into())
            }
        }
    }

    pub(crate) fn backend(&self) -> &Arc<dyn TaskBackend> {
        &self.backend
    }

    pub(crate) fn audit_enabled(&self) -> bool {
        self.audit_enabled
    }
}
