//! Audit log repository for database operations.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::audit_log;

/// Repository for the append-only task audit log.
pub struct AuditLogRepository;

impl AuditLogRepository {
    /// Append one audit entry.
    pub async fn insert<C>(conn: &C, model: audit_log::ActiveModel) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        audit_log::Entity::insert(model).exec(conn).await?;
        Ok(())
    }

    /// Get all audit entries for a task, newest first.
    pub async fn get_for_task<C>(conn: &C, task_id: Uuid) -> Result<Vec<audit_log::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        audit_log::Entity::find()
            .filter(audit_log::Column::TaskId.eq(task_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .all(conn)
            .await
    }
}
