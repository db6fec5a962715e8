//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use taskdeck::backend::local::LocalBackend;
use taskdeck::backend::{
    AuditEntry, AuditRecord, BackendError, ChangeEvent, NewTask, Task, TaskBackend, TaskPatch,
    TaskPriority, TaskStatus,
};
use taskdeck::config::Config;
use taskdeck::storage::LocalStorage;

/// Config for tests: in-memory storage, audit on, no background listener.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.sync.auto_refresh = false;
    config
}

pub async fn local_backend() -> Arc<LocalBackend> {
    let storage = LocalStorage::open_in_memory().await.unwrap();
    Arc::new(LocalBackend::new(storage, 64))
}

pub fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        status: TaskStatus::Todo,
        priority: TaskPriority::Low,
        date: None,
        deadline: None,
        reminder: None,
        position: None,
        project_id: None,
    }
}

/// Backend wrapper with switchable failure injection, delegating to a real
/// in-memory backend otherwise.
pub struct FlakyBackend {
    inner: LocalBackend,
    fail_mutations: AtomicBool,
    fail_fetch: AtomicBool,
    fail_audit: AtomicBool,
}

impl FlakyBackend {
    pub async fn new() -> Arc<Self> {
        let storage = LocalStorage::open_in_memory().await.unwrap();
        Arc::new(Self {
            inner: LocalBackend::new(storage, 64),
            fail_mutations: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            fail_audit: AtomicBool::new(false),
        })
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_audit(&self, fail: bool) {
        self.fail_audit.store(fail, Ordering::SeqCst);
    }

    fn mutation_gate(&self) -> Result<(), BackendError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(BackendError::Other("injected backend failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskBackend for FlakyBackend {
    fn backend_type(&self) -> &str {
        "flaky"
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, BackendError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(BackendError::PermissionDenied);
        }
        self.inner.fetch_tasks().await
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task, BackendError> {
        self.mutation_gate()?;
        self.inner.insert_task(task).await
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task, BackendError> {
        self.mutation_gate()?;
        self.inner.update_task(id, patch).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), BackendError> {
        self.mutation_gate()?;
        self.inner.delete_task(id).await
    }

    async fn delete_all_tasks(&self) -> Result<u64, BackendError> {
        self.mutation_gate()?;
        self.inner.delete_all_tasks().await
    }

    async fn insert_audit_entry(&self, entry: AuditEntry) -> Result<(), BackendError> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(BackendError::Other("injected audit failure".to_string()));
        }
        self.inner.insert_audit_entry(entry).await
    }

    async fn fetch_audit_entries(&self, task_id: Uuid) -> Result<Vec<AuditRecord>, BackendError> {
        self.inner.fetch_audit_entries(task_id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.subscribe()
    }
}
