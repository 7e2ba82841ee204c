//! # taskd-foundation
//!
//! Foundation layer for taskd:
//! - Error: shared error type (Error, Result)
//! - Config: service settings (TaskdConfig)
//! - Storage: JSON config file store (JsonStore)

pub mod config;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    TaskdConfig, DEFAULT_BIND_ADDR, DEFAULT_WORK_DURATION_MS, DEFAULT_WORK_RESULT,
    TASKD_CONFIG_FILE,
};

// ============================================================================
// Storage
// ============================================================================
pub use storage::JsonStore;
