//! Task definition and types

use crate::state::TaskStatus;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use taskd_foundation::{Error, Result};
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a new random TaskId from OS entropy
    ///
    /// Fails instead of falling back to a weaker source when the OS
    /// generator is unavailable.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| Error::IdGeneration(e.to_string()))?;
        Ok(Self(uuid::Builder::from_random_bytes(bytes).into_uuid()))
    }

    /// Parse an id received from a caller
    ///
    /// Only the lowercase hyphenated form that `Display` produces is
    /// accepted. Other spellings of the same UUID were never issued and
    /// are reported as `NotFound`.
    pub fn parse(s: &str) -> Result<Self> {
        match Uuid::try_parse(s) {
            Ok(uuid) if uuid.hyphenated().to_string() == s => Ok(Self(uuid)),
            _ => Err(Error::NotFound(s.to_string())),
        }
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time copy of a task's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub status: TaskStatus,
    pub payload: Vec<u8>,

    /// Empty unless `status` is `Finished`
    pub result: Vec<u8>,

    /// Set only when `status` is `Failed`
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug)]
struct TaskInner {
    status: TaskStatus,
    result: Vec<u8>,
    error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// A tracked unit of work
///
/// `id` and `payload` never change and live outside the lock; the mutable
/// fields share one lock so that status and result are always observed
/// together.
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    payload: Vec<u8>,
    created_at: DateTime<Utc>,
    inner: RwLock<TaskInner>,
}

impl Task {
    /// Create a new pending task
    pub fn new(id: TaskId, payload: Vec<u8>) -> Self {
        Self {
            id,
            payload,
            created_at: Utc::now(),
            inner: RwLock::new(TaskInner {
                status: TaskStatus::Pending,
                result: Vec::new(),
                error: None,
                started_at: None,
                finished_at: None,
            }),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn status(&self) -> TaskStatus {
        self.inner.read().status
    }

    /// Move to a non-terminal status
    ///
    /// Terminal states carry data and are only reachable through
    /// [`Task::complete_with`] and [`Task::fail_with`].
    pub fn set_status(&self, status: TaskStatus) -> Result<()> {
        let mut inner = self.inner.write();
        if status.is_terminal() || !inner.status.can_transition_to(status) {
            return Err(Error::invalid_transition(inner.status, status));
        }

        if status.is_running() {
            inner.started_at = Some(Utc::now());
        }
        debug!("Task {}: {} -> {}", self.id, inner.status, status);
        inner.status = status;
        Ok(())
    }

    /// Mark task as finished with the given result
    ///
    /// An empty result would leave a finished task indistinguishable from an
    /// unfinished one, so it is recorded as a failure instead.
    pub fn complete_with(&self, result: Vec<u8>) -> Result<()> {
        if result.is_empty() {
            return self.fail_with("work produced an empty result");
        }

        let mut inner = self.inner.write();
        if !inner.status.can_transition_to(TaskStatus::Finished) {
            return Err(Error::invalid_transition(
                inner.status,
                TaskStatus::Finished,
            ));
        }

        inner.status = TaskStatus::Finished;
        inner.result = result;
        inner.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Mark task as failed
    pub fn fail_with(&self, error: impl Into<String>) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.status.can_transition_to(TaskStatus::Failed) {
            return Err(Error::invalid_transition(inner.status, TaskStatus::Failed));
        }

        inner.status = TaskStatus::Failed;
        inner.error = Some(error.into());
        inner.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Take an independent, consistent copy of the task's fields
    pub fn snapshot(&self) -> TaskSnapshot {
        let inner = self.inner.read();
        TaskSnapshot {
            id: self.id,
            status: inner.status,
            payload: self.payload.clone(),
            result: inner.result.clone(),
            error: inner.error.clone(),
            created_at: self.created_at,
            started_at: inner.started_at,
            finished_at: inner.finished_at,
        }
    }
}
