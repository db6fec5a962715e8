//! Configuration management for taskdeck
//!
//! This module handles loading, parsing, and validation of configuration
//! files. Configuration lives in a TOML file under the platform config
//! directory; every section falls back to sensible defaults so a missing or
//! partial file is fine.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_GENERATED, DEFAULT_AUDIT_ACTOR, DEFAULT_CHANNEL_CAPACITY};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend type (currently only "local")
    pub backend_type: String,
    /// Database file path; in-memory storage when unset
    pub db_path: Option<PathBuf>,
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Refetch automatically when the backend reports changes
    pub auto_refresh: bool,
    /// Capacity of the change-notification channel
    pub channel_capacity: usize,
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Record audit entries for successful mutations
    pub enabled: bool,
    /// Actor name/email stamped on audit entries
    pub actor: String,
}

/// Diagnostic logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable diagnostic logging
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, or error
    pub level: String,
    /// Optional log file; stderr only when unset
    pub file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend_type: "local".to_string(),
            db_path: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            actor: DEFAULT_AUDIT_ACTOR.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location or return defaults
    pub fn load() -> Result<Self> {
        match Self::find_config_file()? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let body = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(&path, format!("{CONFIG_GENERATED}{body}"))
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Locate the config file, if one exists
    pub fn find_config_file() -> Result<Option<PathBuf>> {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(None);
        };
        let path = config_dir.join("taskdeck").join("config.toml");
        Ok(path.exists().then_some(path))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend_type != "local" {
            bail!("Unknown backend type: {}", self.storage.backend_type);
        }
        if self.sync.channel_capacity == 0 {
            bail!("sync.channel_capacity must be at least 1");
        }
        if self.audit.actor.trim().is_empty() {
            bail!("audit.actor must not be empty");
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => bail!("Unknown log level: {other}"),
        }
        Ok(())
    }
}
