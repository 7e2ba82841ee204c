//! Taskd Config - service settings
//!
//! Global and project settings are merged, then CLI flags override them.

use crate::storage::JsonStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Config file name
pub const TASKD_CONFIG_FILE: &str = "config.json";

/// Default bind address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default work duration (3 minutes)
pub const DEFAULT_WORK_DURATION_MS: u64 = 3 * 60 * 1000;

/// Default work result
pub const DEFAULT_WORK_RESULT: &str = "result";

/// Unified taskd settings
///
/// Every field is optional; unset fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskdConfig {
    /// Version (for migrations)
    #[serde(default = "default_version")]
    pub version: u32,

    /// HTTP server bind address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<String>,

    /// How long each work unit takes (milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_duration_ms: Option<u64>,

    /// Result recorded when a work unit completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_result: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl TaskdConfig {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Self::default()
        }
    }

    /// Settings with every value filled in (used by `taskd init`)
    pub fn with_defaults() -> Self {
        Self::new()
            .bind_addr(DEFAULT_BIND_ADDR)
            .work_duration_ms(DEFAULT_WORK_DURATION_MS)
            .work_result(DEFAULT_WORK_RESULT)
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// Load global + project, merged
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. Global config
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<TaskdConfig>(TASKD_CONFIG_FILE)? {
                debug!("Loaded global config from {}", global.base_dir().display());
                config.merge(global_config);
            }
        }

        // 2. Project config
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) =
                project.load_optional::<TaskdConfig>(TASKD_CONFIG_FILE)?
            {
                debug!("Loaded project config from {}", project.base_dir().display());
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::Config(format!("Invalid config path: {}", path.display())))?;
        JsonStore::new(dir).load(filename)
    }

    /// Save into the given store
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(TASKD_CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// Merge another config into this one (other wins)
    pub fn merge(&mut self, other: TaskdConfig) {
        if other.bind_addr.is_some() {
            self.bind_addr = other.bind_addr;
        }
        if other.work_duration_ms.is_some() {
            self.work_duration_ms = other.work_duration_ms;
        }
        if other.work_result.is_some() {
            self.work_result = other.work_result;
        }
    }

    /// Validate values
    pub fn validate(&self) -> Result<()> {
        if self.resolved_bind_addr().trim().is_empty() {
            return Err(Error::Config("bindAddr must not be empty".to_string()));
        }
        if self.resolved_work_result().is_empty() {
            return Err(Error::Config("workResult must not be empty".to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Resolved values
    // ========================================================================

    pub fn resolved_bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn work_duration(&self) -> Duration {
        Duration::from_millis(self.work_duration_ms.unwrap_or(DEFAULT_WORK_DURATION_MS))
    }

    pub fn resolved_work_result(&self) -> &[u8] {
        self.work_result
            .as_deref()
            .unwrap_or(DEFAULT_WORK_RESULT)
            .as_bytes()
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    pub fn work_duration_ms(mut self, ms: u64) -> Self {
        self.work_duration_ms = Some(ms);
        self
    }

    pub fn work_result(mut self, result: impl Into<String>) -> Self {
        self.work_result = Some(result.into());
        self
    }
}
