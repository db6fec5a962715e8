use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only record of a task mutation. Snapshots are stored as JSON text;
/// `previous_data` is null for creations and `new_data` is null for deletions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub task_id: Uuid,
    pub action: String,
    pub previous_data: Option<String>,
    pub new_data: Option<String>,
    pub actor: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
