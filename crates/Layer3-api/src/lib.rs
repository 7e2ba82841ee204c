//! # taskd-api
//!
//! HTTP adapter for taskd. Decodes requests, calls the [`TaskService`]
//! and maps its errors onto status codes; it holds no task state itself.
//!
//! ## Routes
//!
//! - `POST /task/run` - `{"payload": "<base64>"}` -> `{"id": "..."}`
//! - `GET /task/get/{id}` or `GET /task/get?id=...` - task snapshot
//! - `GET /health` - liveness probe
//!
//! [`TaskService`]: taskd_task::TaskService

pub mod dto;
pub mod error;
pub mod handlers;
pub mod server;

pub use dto::{ErrorResponse, HealthResponse, RunRequest, RunResponse, TaskResponse};
pub use error::ApiError;
pub use server::{router, ApiServer, AppState};
