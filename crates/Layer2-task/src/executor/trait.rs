//! Executor trait

use async_trait::async_trait;
use taskd_foundation::Result;

/// Executor trait - implement to replace the unit of work a task performs
///
/// Returning `Ok` finishes the task with the returned bytes; returning `Err`
/// fails it with the error message.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Perform the work for one task
    async fn execute(&self, payload: &[u8]) -> Result<Vec<u8>>;

    /// Get executor name
    fn name(&self) -> &'static str;
}
