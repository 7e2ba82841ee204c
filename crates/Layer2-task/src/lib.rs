//! # taskd-task
//!
//! Task registry and execution core for taskd.
//! A submitted payload becomes a task that runs in its own tokio task; callers
//! poll it by id until they observe a terminal state, at which point the task
//! is reaped.
//!
//! ## Features
//!
//! - Per-task locking so status reads never wait on other tasks
//! - Forward-only status machine (`Pending -> Running -> Finished | Failed`)
//! - Pluggable work through the [`Executor`] trait
//! - Draining shutdown

pub mod executor;
pub mod manager;
pub mod service;
pub mod state;
pub mod task;

pub use executor::{Executor, SimulatedExecutor};
pub use manager::{IdSource, TaskManager, TaskManagerConfig};
pub use service::TaskService;
pub use state::TaskStatus;
pub use task::{Task, TaskId, TaskSnapshot};
