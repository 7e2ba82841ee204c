//! Storage module for taskd
//!
//! - `json`: JSON - config file save/load
//!
//! Tasks themselves live only in memory and do not survive a restart.

mod json;

pub use json::JsonStore;
