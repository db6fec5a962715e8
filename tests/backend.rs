mod common;

use std::time::Duration;

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use taskdeck::backend::local::LocalBackend;
use taskdeck::backend::{
    AuditAction, AuditEntry, BackendError, ChangeKind, TaskBackend, TaskPatch, TaskStatus,
};
use taskdeck::storage::LocalStorage;

use common::{local_backend, new_task};

#[tokio::test]
async fn test_insert_assigns_id_and_persists_fields() {
    let backend = local_backend().await;

    let mut new = new_task("persisted");
    new.description = Some("with a description".to_string());
    new.date = Some("2026-09-01".to_string());
    new.position = Some(4);

    let stored = backend.insert_task(new).await.unwrap();
    assert_ne!(stored.id, Uuid::nil());
    assert_eq!(stored.title, "persisted");
    assert_eq!(stored.description.as_deref(), Some("with a description"));
    assert_eq!(stored.date.as_deref(), Some("2026-09-01"));
    assert_eq!(stored.position, Some(4));
    assert!(!stored.created_at.is_empty());

    let fetched = backend.fetch_tasks().await.unwrap();
    assert_eq!(fetched, vec![stored]);
}

#[tokio::test]
async fn test_fetch_orders_by_position_nulls_first_then_newest() {
    let backend = local_backend().await;

    let mut late = new_task("position one");
    late.position = Some(1);
    backend.insert_task(late).await.unwrap();

    // Distinct created_at timestamps for the unpositioned pair.
    let first_unpositioned = backend.insert_task(new_task("older null")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second_unpositioned = backend.insert_task(new_task("newer null")).await.unwrap();

    let mut early = new_task("position zero");
    early.position = Some(0);
    backend.insert_task(early).await.unwrap();

    let titles: Vec<_> = backend
        .fetch_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();

    assert_eq!(
        titles,
        vec!["newer null", "older null", "position zero", "position one"]
    );
    assert!(second_unpositioned.created_at > first_unpositioned.created_at);
}

#[tokio::test]
async fn test_update_unknown_task_is_an_error() {
    let backend = local_backend().await;
    let patch = TaskPatch {
        title: Some("nobody".to_string()),
        ..TaskPatch::default()
    };
    let result = backend.update_task(Uuid::new_v4(), patch).await;
    assert!(matches!(result, Err(BackendError::Other(_))));
}

#[tokio::test]
async fn test_delete_unknown_task_is_an_error() {
    let backend = local_backend().await;
    let mut rx = backend.subscribe();

    let result = backend.delete_task(Uuid::new_v4()).await;
    assert!(matches!(result, Err(BackendError::Other(_))));

    // Nothing was removed, so no change event is published either.
    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn test_update_merges_only_patched_fields() {
    let backend = local_backend().await;

    let mut new = new_task("partial");
    new.description = Some("keep me".to_string());
    let stored = backend.insert_task(new).await.unwrap();

    let patch = TaskPatch {
        status: Some(TaskStatus::InProgress),
        ..TaskPatch::default()
    };
    let updated = backend.update_task(stored.id, patch).await.unwrap();

    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, "partial");
    assert_eq!(updated.description.as_deref(), Some("keep me"));
    assert_eq!(updated.created_at, stored.created_at);
}

#[tokio::test]
async fn test_delete_all_reports_rows_removed() {
    let backend = local_backend().await;
    for title in ["a", "b", "c"] {
        backend.insert_task(new_task(title)).await.unwrap();
    }

    let removed = backend.delete_all_tasks().await.unwrap();
    assert_eq!(removed, 3);
    assert!(backend.fetch_tasks().await.unwrap().is_empty());

    // Idempotent on an empty table.
    assert_eq!(backend.delete_all_tasks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_audit_entries_round_trip() {
    let backend = local_backend().await;
    let stored = backend.insert_task(new_task("tracked")).await.unwrap();

    backend
        .insert_audit_entry(AuditEntry {
            task_id: stored.id,
            action: AuditAction::Created,
            previous: None,
            new: Some(stored.clone()),
            actor: "tester@example.com".to_string(),
        })
        .await
        .unwrap();

    let trail = backend.fetch_audit_entries(stored.id).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::Created);
    assert_eq!(trail[0].actor, "tester@example.com");
    assert!(trail[0].previous.is_none());
    let snapshot = trail[0].new.as_ref().unwrap();
    assert_eq!(snapshot["title"], "tracked");
}

#[tokio::test]
async fn test_mutations_publish_change_events() {
    let backend = local_backend().await;
    let mut rx = backend.subscribe();

    let stored = backend.insert_task(new_task("watched")).await.unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Inserted);
    assert_eq!(event.task_id, Some(stored.id));

    let patch = TaskPatch {
        status: Some(TaskStatus::Done),
        ..TaskPatch::default()
    };
    backend.update_task(stored.id, patch).await.unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Updated);

    backend.delete_task(stored.id).await.unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Deleted);
    assert_eq!(event.task_id, Some(stored.id));

    backend.delete_all_tasks().await.unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, ChangeKind::Deleted);
    assert_eq!(event.task_id, None);
}

#[tokio::test]
async fn test_missing_table_maps_to_closed_error_kind() {
    let storage = LocalStorage::open_in_memory().await.unwrap();
    storage.conn.execute_unprepared("DROP TABLE tasks").await.unwrap();
    let backend = LocalBackend::new(storage, 8);

    let result = backend.fetch_tasks().await;
    assert_eq!(result, Err(BackendError::TableMissing));
}
