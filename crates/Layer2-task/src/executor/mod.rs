//! Task executors
//!
//! - `SimulatedExecutor` - fixed-duration delay standing in for I/O-bound work

pub mod simulated;
pub mod r#trait;

pub use r#trait::Executor;
pub use simulated::SimulatedExecutor;
