//! Task Manager - owns live tasks and their execution units
//!
//! Features:
//! - Immediate submit, background execution
//! - Snapshot reads that never wait on task work
//! - Reap-on-read: a terminal task is returned by exactly one fetch
//! - Draining shutdown

use crate::executor::{Executor, SimulatedExecutor};
use crate::state::TaskStatus;
use crate::task::{Task, TaskId, TaskSnapshot};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use taskd_foundation::{Error, Result, TaskdConfig, DEFAULT_WORK_RESULT};
use tokio::sync::RwLock;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Configuration for task manager
#[derive(Debug, Clone)]
pub struct TaskManagerConfig {
    /// How long each simulated work unit takes
    pub work_duration: Duration,

    /// Result recorded by each simulated work unit
    pub work_result: Vec<u8>,
}

impl Default for TaskManagerConfig {
    fn default() -> Self {
        Self {
            work_duration: Duration::from_secs(180),
            work_result: DEFAULT_WORK_RESULT.as_bytes().to_vec(),
        }
    }
}

impl From<&TaskdConfig> for TaskManagerConfig {
    fn from(config: &TaskdConfig) -> Self {
        Self {
            work_duration: config.work_duration(),
            work_result: config.resolved_work_result().to_vec(),
        }
    }
}

/// Source of fresh task ids
pub type IdSource = fn() -> Result<TaskId>;

/// Task Manager - handles task lifecycle and execution
///
/// Clones share the same task map and execution tracker.
#[derive(Clone)]
pub struct TaskManager {
    /// Live tasks by ID
    tasks: Arc<RwLock<HashMap<TaskId, Arc<Task>>>>,

    /// Execution units spawned by `submit`
    tracker: TaskTracker,

    /// Work performed by every task
    executor: Arc<dyn Executor>,

    /// Id generator
    id_source: IdSource,
}

impl TaskManager {
    /// Create a new task manager running simulated work
    pub fn new(config: TaskManagerConfig) -> Self {
        Self::with_executor(Arc::new(SimulatedExecutor::new(
            config.work_duration,
            config.work_result,
        )))
    }

    /// Create a task manager with a custom executor
    pub fn with_executor(executor: Arc<dyn Executor>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            tracker: TaskTracker::new(),
            executor,
            id_source: TaskId::generate,
        }
    }

    /// Replace the id generator
    pub fn with_id_source(mut self, id_source: IdSource) -> Self {
        self.id_source = id_source;
        self
    }

    /// Submit a new task and start executing it in the background
    ///
    /// Returns as soon as the task is stored; the id is immediately
    /// fetchable.
    pub async fn submit(&self, payload: Vec<u8>) -> Result<TaskId> {
        let task_id = (self.id_source)()?;
        let task = Arc::new(Task::new(task_id, payload));

        // Store task
        {
            let mut tasks = self.tasks.write().await;
            match tasks.entry(task_id) {
                Entry::Occupied(_) => {
                    warn!("Refusing duplicate task id {}", task_id);
                    return Err(Error::IdCollision(task_id.to_string()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(&task));
                }
            }
        }

        self.tracker.spawn(run_task(task, Arc::clone(&self.executor)));

        info!("Submitted task {} ({})", task_id, self.executor.name());
        Ok(task_id)
    }

    /// Fetch a snapshot of a task
    ///
    /// A terminal snapshot is handed out once; the task is removed in the
    /// same call and every later fetch reports `NotFound`.
    pub async fn fetch(&self, id: &str) -> Result<TaskSnapshot> {
        let task_id = TaskId::parse(id)?;

        let task = {
            let tasks = self.tasks.read().await;
            tasks.get(&task_id).cloned()
        };
        let task = task.ok_or_else(|| Error::NotFound(id.to_string()))?;

        let snapshot = task.snapshot();
        if snapshot.is_terminal() {
            let removed = {
                let mut tasks = self.tasks.write().await;
                tasks.remove(&task_id).is_some()
            };

            // Lost the race against a concurrent fetch that already reaped it
            if !removed {
                return Err(Error::NotFound(id.to_string()));
            }
            debug!("Reaped task {} ({})", task_id, snapshot.status);
        }

        Ok(snapshot)
    }

    /// Wait for every execution unit spawned so far to finish
    ///
    /// Does not cancel anything; tasks keep running to completion.
    pub async fn shutdown(&self) {
        let in_flight = self.tracker.len();
        info!("Shutting down task manager, waiting for {} task(s)", in_flight);

        self.tracker.close();
        self.tracker.wait().await;

        info!("All tasks finished");
    }

    /// Number of tasks currently stored (not yet reaped)
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Number of execution units still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Current status of a stored task, without reaping it
    pub async fn peek_status(&self, id: TaskId) -> Option<TaskStatus> {
        let task = {
            let tasks = self.tasks.read().await;
            tasks.get(&id).cloned()
        };
        task.map(|task| task.status())
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new(TaskManagerConfig::default())
    }
}

/// Run-and-complete: the body of one execution unit
async fn run_task(task: Arc<Task>, executor: Arc<dyn Executor>) {
    let task_id = task.id();

    if let Err(e) = task.set_status(TaskStatus::Running) {
        warn!("Task {} could not start: {}", task_id, e);
        return;
    }

    let outcome = match executor.execute(task.payload()).await {
        Ok(result) => task.complete_with(result),
        Err(e) => {
            warn!("Task {} failed: {}", task_id, e);
            task.fail_with(e.to_string())
        }
    };

    match outcome {
        Ok(()) => info!("Task {} completed: {}", task_id, task.status()),
        Err(e) => warn!("Task {} could not record its outcome: {}", task_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    fn fast_manager(ms: u64) -> TaskManager {
        TaskManager::new(TaskManagerConfig {
            work_duration: Duration::from_millis(ms),
            work_result: b"result".to_vec(),
        })
    }

    struct FailingExecutor;

    #[async_trait]
    impl Executor for FailingExecutor {
        async fn execute(&self, _payload: &[u8]) -> Result<Vec<u8>> {
            Err(Error::Work("disk on fire".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn fixed_id() -> Result<TaskId> {
        TaskId::parse("6f1c8f5e-3d7a-4b2e-9a41-0c2d5e8f7b10")
    }

    fn rank(status: TaskStatus) -> u8 {
        match status {
            TaskStatus::Pending => 0,
            TaskStatus::Running => 1,
            TaskStatus::Finished | TaskStatus::Failed => 2,
        }
    }

    fn broken_entropy() -> Result<TaskId> {
        Err(Error::IdGeneration("entropy source unavailable".to_string()))
    }

    #[tokio::test]
    async fn test_task_manager_creation() {
        let manager = TaskManager::default();
        assert_eq!(manager.task_count().await, 0);
        assert_eq!(manager.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_submit_then_fetch_immediately() {
        let manager = fast_manager(200);
        let id = manager.submit(b"payload".to_vec()).await.unwrap();

        let snapshot = manager.fetch(&id.to_string()).await.unwrap();
        assert_eq!(snapshot.id, id);
        assert!(matches!(
            snapshot.status,
            TaskStatus::Pending | TaskStatus::Running
        ));
        assert_eq!(snapshot.payload, b"payload");
        assert!(snapshot.result.is_empty());

        // Still present: non-terminal reads do not reap
        assert_eq!(manager.task_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let manager = fast_manager(10);
        let never_issued = TaskId::generate().unwrap().to_string();

        assert!(manager.fetch(&never_issued).await.unwrap_err().is_not_found());
        assert!(manager.fetch("").await.unwrap_err().is_not_found());
        assert!(manager.fetch("exampleId").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_alternate_id_spellings_neither_find_nor_reap() {
        let manager = fast_manager(20);
        let task_id = manager.submit(b"payload".to_vec()).await.unwrap();
        let id = task_id.to_string();
        let aliases = [
            id.to_uppercase(),
            task_id.0.simple().to_string(),
            task_id.0.braced().to_string(),
            task_id.0.urn().to_string(),
            format!(" {id}"),
        ];

        for alias in &aliases {
            let err = assert_err!(manager.fetch(alias).await);
            assert!(err.is_not_found(), "alias {alias}");
        }

        manager.shutdown().await;

        for alias in &aliases {
            assert!(manager.fetch(alias).await.unwrap_err().is_not_found());
        }
        assert_eq!(manager.task_count().await, 1);

        let snapshot = assert_ok!(manager.fetch(&id).await);
        assert_eq!(snapshot.status, TaskStatus::Finished);
        assert_eq!(snapshot.result, b"result");
    }

    #[tokio::test]
    async fn test_peek_status_does_not_reap() {
        let manager = fast_manager(10);
        let id = manager.submit(b"p".to_vec()).await.unwrap();
        manager.shutdown().await;

        assert_eq!(manager.peek_status(id).await, Some(TaskStatus::Finished));
        assert_eq!(manager.task_count().await, 1);

        manager.fetch(&id.to_string()).await.unwrap();
        assert_eq!(manager.peek_status(id).await, None);
    }

    #[tokio::test]
    async fn test_finished_task_is_reaped_on_read() {
        let manager = fast_manager(20);
        let id = manager.submit(b"payload".to_vec()).await.unwrap().to_string();

        manager.shutdown().await;

        let snapshot = manager.fetch(&id).await.unwrap();
        assert_eq!(snapshot.status, TaskStatus::Finished);
        assert_eq!(snapshot.payload, b"payload");
        assert_eq!(snapshot.result, b"result");

        let second = assert_err!(manager.fetch(&id).await);
        assert!(second.is_not_found());
        assert_eq!(manager.task_count().await, 0);
    }

    #[tokio::test]
    async fn test_end_to_end_polling() {
        let manager = fast_manager(50);
        let id = manager.submit(b"payload".to_vec()).await.unwrap().to_string();

        let first = manager.fetch(&id).await.unwrap();
        assert!(!first.is_terminal());
        assert!(first.result.is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;

        let done = manager.fetch(&id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Finished);
        assert_eq!(done.result, b"result");

        assert!(manager.fetch(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_status_is_monotonic_across_polls() {
        let manager = fast_manager(30);
        let id = manager.submit(b"p".to_vec()).await.unwrap().to_string();

        let mut last = TaskStatus::Pending;
        loop {
            let snapshot = match manager.fetch(&id).await {
                Ok(snapshot) => snapshot,
                Err(e) => panic!("unexpected error while polling: {e}"),
            };

            assert!(
                rank(snapshot.status) >= rank(last),
                "regressed from {last} to {}",
                snapshot.status
            );
            assert_eq!(
                !snapshot.result.is_empty(),
                snapshot.status == TaskStatus::Finished
            );
            last = snapshot.status;

            if snapshot.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(last, TaskStatus::Finished);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submits_are_isolated() {
        let manager = fast_manager(20);

        let submits = (0..64).map(|i| {
            let manager = manager.clone();
            async move {
                let payload = format!("payload-{i}").into_bytes();
                let id = manager.submit(payload.clone()).await.unwrap();
                (id, payload)
            }
        });
        let submitted = futures::future::join_all(submits).await;

        let ids: std::collections::HashSet<_> = submitted.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), 64);

        manager.shutdown().await;

        for (id, payload) in submitted {
            let snapshot = manager.fetch(&id.to_string()).await.unwrap();
            assert_eq!(snapshot.id, id);
            assert_eq!(snapshot.payload, payload);
            assert_eq!(snapshot.result, b"result");
        }
        assert_eq!(manager.task_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_terminal_snapshot_observed_exactly_once() {
        let manager = fast_manager(5);
        let id = manager.submit(b"p".to_vec()).await.unwrap().to_string();
        manager.shutdown().await;

        let readers = (0..16).map(|_| {
            let manager = manager.clone();
            let id = id.clone();
            tokio::spawn(async move { manager.fetch(&id).await })
        });
        let outcomes = futures::future::join_all(readers).await;

        let successes = outcomes
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(|outcome| outcome.is_ok())
            .count();
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_all_tasks() {
        let manager = fast_manager(30);
        let mut ids = Vec::new();
        for i in 0..8u8 {
            ids.push(manager.submit(vec![i]).await.unwrap());
        }

        manager.shutdown().await;
        assert_eq!(manager.in_flight(), 0);

        for id in ids {
            assert_eq!(manager.peek_status(id).await, Some(TaskStatus::Finished));
        }
    }

    #[tokio::test]
    async fn test_failed_work_is_reported_and_reaped() {
        let manager = TaskManager::with_executor(Arc::new(FailingExecutor));
        let id = manager.submit(b"p".to_vec()).await.unwrap().to_string();
        manager.shutdown().await;

        let snapshot = manager.fetch(&id).await.unwrap();
        assert_eq!(snapshot.status, TaskStatus::Failed);
        assert!(snapshot.result.is_empty());
        assert!(snapshot.error.unwrap().contains("disk on fire"));

        assert!(manager.fetch(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_id_collision_fails_submit() {
        let manager = fast_manager(10).with_id_source(fixed_id);

        assert_ok!(manager.submit(b"first".to_vec()).await);
        let err = assert_err!(manager.submit(b"second".to_vec()).await);
        assert!(matches!(err, Error::IdCollision(_)));

        // The first task is untouched
        manager.shutdown().await;
        let id = fixed_id().unwrap().to_string();
        assert_eq!(manager.fetch(&id).await.unwrap().payload, b"first");
    }

    #[tokio::test]
    async fn test_entropy_failure_fails_submit() {
        let manager = fast_manager(10).with_id_source(broken_entropy);

        let err = assert_err!(manager.submit(b"p".to_vec()).await);
        assert!(matches!(err, Error::IdGeneration(_)));
        assert_eq!(manager.task_count().await, 0);
        assert_eq!(manager.in_flight(), 0);
    }

    #[test]
    fn test_config_from_service_config() {
        let service = TaskdConfig::new().work_duration_ms(25).work_result("ok");
        let config = TaskManagerConfig::from(&service);
        assert_eq!(config.work_duration, Duration::from_millis(25));
        assert_eq!(config.work_result, b"ok");
    }
}
