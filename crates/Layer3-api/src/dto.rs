//! Request/response bodies
//!
//! Byte fields travel as standard base64 strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskd_foundation::{Error, Result};
use taskd_task::{TaskSnapshot, TaskStatus};

/// Task creation request
#[derive(Debug, Serialize, Deserialize)]
pub struct RunRequest {
    /// base64-encoded payload
    pub payload: String,
}

impl RunRequest {
    pub fn from_bytes(payload: &[u8]) -> Self {
        Self {
            payload: STANDARD.encode(payload),
        }
    }

    /// Decode the payload bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| Error::InvalidInput(format!("payload is not valid base64: {}", e)))
    }
}

/// Task creation response
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    pub id: String,
}

/// Lookup by query string (`/task/get?id=...`)
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub id: Option<String>,
}

/// Task state as seen by callers
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub status: TaskStatus,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskResponse {
    /// Decode the result bytes, if any
    pub fn result_bytes(&self) -> Option<Vec<u8>> {
        self.result
            .as_deref()
            .and_then(|encoded| STANDARD.decode(encoded).ok())
    }

    /// Decode the payload bytes
    pub fn payload_bytes(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.payload).ok()
    }
}

impl From<TaskSnapshot> for TaskResponse {
    fn from(snapshot: TaskSnapshot) -> Self {
        let result = if snapshot.result.is_empty() {
            None
        } else {
            Some(STANDARD.encode(&snapshot.result))
        };

        Self {
            id: snapshot.id.to_string(),
            status: snapshot.status,
            payload: STANDARD.encode(&snapshot.payload),
            result,
            error: snapshot.error,
            created_at: snapshot.created_at,
            started_at: snapshot.started_at,
            finished_at: snapshot.finished_at,
        }
    }
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Liveness body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
