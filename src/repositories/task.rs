//! Task repository for database operations.

use sea_orm::sea_query::NullOrdering;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, Order, QueryOrder};
use uuid::Uuid;

use crate::entities::task;

/// Repository for task-related database operations.
pub struct TaskRepository;

impl TaskRepository {
    /// Get all tasks in display order: manual position ascending with
    /// unpositioned tasks first, then newest created first.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find()
            .order_by_with_nulls(task::Column::Position, Order::Asc, NullOrdering::First)
            .order_by_desc(task::Column::CreatedAt)
            .all(conn)
            .await
    }

    /// Get a single task by id.
    pub async fn get_by_id<C>(conn: &C, id: Uuid) -> Result<Option<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find_by_id(id).one(conn).await
    }

    /// Insert a new task and return the stored row.
    pub async fn insert<C>(conn: &C, model: task::ActiveModel) -> Result<task::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let id = match &model.id {
            sea_orm::ActiveValue::Set(id) => *id,
            _ => return Err(DbErr::Custom("task insert requires an id".into())),
        };
        task::Entity::insert(model).exec(conn).await?;
        task::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("task not found after insert: {id}")))
    }

    /// Update a task in the database.
    pub async fn update<C>(conn: &C, model: task::ActiveModel) -> Result<task::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        model.update(conn).await
    }

    /// Delete a task by id. Returns the number of rows removed (0 or 1).
    pub async fn delete_by_id<C>(conn: &C, id: Uuid) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::delete_by_id(id).exec(conn).await?.rows_affected)
    }

    /// Delete every task. Returns the number of rows removed.
    pub async fn delete_all<C>(conn: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::delete_many().exec(conn).await?.rows_affected)
    }
}
