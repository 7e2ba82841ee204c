//! Service trait - the surface transports call into

use crate::manager::TaskManager;
use crate::task::{TaskId, TaskSnapshot};
use async_trait::async_trait;
use taskd_foundation::Result;

/// Operations a transport needs from the task registry
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Store a task for `payload` and start it
    async fn create_task(&self, payload: Vec<u8>) -> Result<TaskId>;

    /// Snapshot a task, reaping it if it is terminal
    async fn task_result(&self, id: &str) -> Result<TaskSnapshot>;

    /// Wait for in-flight work before exit
    async fn stop(&self);
}

#[async_trait]
impl TaskService for TaskManager {
    async fn create_task(&self, payload: Vec<u8>) -> Result<TaskId> {
        self.submit(payload).await
    }

    async fn task_result(&self, id: &str) -> Result<TaskSnapshot> {
        self.fetch(id).await
    }

    async fn stop(&self) {
        self.shutdown().await;
    }
}
