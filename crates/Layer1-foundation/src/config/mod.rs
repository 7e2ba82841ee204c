//! Config - service configuration
//!
//! - `taskd.rs` - TaskdConfig, merged from global and project files

mod taskd;

pub use taskd::{
    TaskdConfig, DEFAULT_BIND_ADDR, DEFAULT_WORK_DURATION_MS, DEFAULT_WORK_RESULT,
    TASKD_CONFIG_FILE,
};
