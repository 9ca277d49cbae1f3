//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the wallet handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener and stop on shutdown signal

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::signer::Signer;
use crate::tx::{TxExecutor, TxPlanner};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub planner: TxPlanner,
    pub executor: TxExecutor,
    pub signer: Arc<dyn Signer>,
}

/// HTTP server for the wallet API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    Router::new()
        .route("/tx/plan", post(handlers::plan_transfer))
        .route("/tx/execute", post(handlers::execute_transfer))
        .route("/tx/{id}", get(handlers::get_status))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
