//! Simulated executor

use super::Executor;
use async_trait::async_trait;
use std::time::Duration;
use taskd_foundation::{Result, DEFAULT_WORK_DURATION_MS, DEFAULT_WORK_RESULT};

/// Sleeps for a fixed duration and yields a fixed result
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    duration: Duration,
    result: Vec<u8>,
}

impl SimulatedExecutor {
    pub fn new(duration: Duration, result: impl Into<Vec<u8>>) -> Self {
        Self {
            duration,
            result: result.into(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_WORK_DURATION_MS),
            DEFAULT_WORK_RESULT.as_bytes(),
        )
    }
}

#[async_trait]
impl Executor for SimulatedExecutor {
    async fn execute(&self, _payload: &[u8]) -> Result<Vec<u8>> {
        tokio::time::sleep(self.duration).await;
        Ok(self.result.clone())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
