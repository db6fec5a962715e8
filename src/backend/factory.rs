//! Backend factory for creating backend instances from configuration.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use super::{local::LocalBackend, TaskBackend};
use crate::config::Config;
use crate::storage::LocalStorage;

/// Create a backend instance from the application configuration.
///
/// The returned backend is explicitly owned by the caller; its lifecycle is
/// tied to application startup and shutdown, not to first use.
///
/// # Errors
/// Returns an error if the backend type is unknown or storage fails to open.
pub async fn create_backend(config: &Config) -> Result<Arc<dyn TaskBackend>> {
    match config.storage.backend_type.as_str() {
        "local" => {
            let storage = LocalStorage::new(&config.storage).await?;
            Ok(Arc::new(LocalBackend::new(
                storage,
                config.sync.channel_capacity,
            )))
        }
        // A hosted adapter (PostgREST-style) would slot in here.
        other => Err(anyhow!("Unknown backend type: {other}")),
    }
}
