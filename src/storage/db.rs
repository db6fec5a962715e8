use std::path::Path;

use anyhow::{Context, Result};
use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::config::StorageConfig;
use crate::entities::{audit_log, task};

/// Local storage manager owning the database connection.
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open storage as configured: file-backed when a path is set,
    /// in-memory otherwise.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        match &config.db_path {
            Some(path) => Self::open(path).await,
            None => Self::open_in_memory().await,
        }
    }

    /// Open an in-memory database. Every call returns independent storage.
    pub async fn open_in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Open (and create if missing) a file-backed database.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", path.as_ref().display());
        Self::connect(&url).await
    }

    async fn connect(url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(url.to_string());
        // A single connection keeps in-memory databases coherent and avoids
        // SQLite writer contention.
        options.max_connections(1).sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("failed to open database: {url}"))?;

        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Create the tasks and audit log tables from the entity definitions.
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut tasks: TableCreateStatement = schema.create_table_from_entity(task::Entity);
        tasks.if_not_exists();
        self.conn.execute(backend.build(&tasks)).await?;

        let mut audit: TableCreateStatement = schema.create_table_from_entity(audit_log::Entity);
        audit.if_not_exists();
        self.conn.execute(backend.build(&audit)).await?;

        Ok(())
    }
}
