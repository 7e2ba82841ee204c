//! HTTP server

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use taskd_task::TaskService;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;

/// Shared application state
pub struct AppState {
    pub service: Arc<dyn TaskService>,
}

/// Build the router over a task service
pub fn router(service: Arc<dyn TaskService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/task/run", post(handlers::run_task))
        .route("/task/get", get(handlers::get_task_by_query))
        .route("/task/get/{id}", get(handlers::get_task))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// taskd HTTP server
pub struct ApiServer {
    listener: TcpListener,
    service: Arc<dyn TaskService>,
}

impl ApiServer {
    /// Bind to `addr`
    pub async fn bind(addr: &str, service: Arc<dyn TaskService>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, service })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then drain in-flight tasks
    ///
    /// New connections stop being accepted first; the task service is
    /// stopped only after the listener is closed.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("taskd listening on http://{}", self.listener.local_addr()?);

        let app = router(Arc::clone(&self.service));
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped, draining tasks");
        self.service.stop().await;
        Ok(())
    }
}
