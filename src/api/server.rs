//! HTTP server wiring

use crate::api::routes::{create_router, ApiState};
use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server
pub struct ApiServer {
    config: ServerConfig,
    state: ApiState,
    shutdown: Arc<Notify>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ServerConfig, state: ApiState) -> Self {
        Self {
            config,
            state,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared state
    pub fn state(&self) -> &ApiState {
        &self.state
    }

    /// Build the router with request tracing
    pub fn router(&self) -> Router {
        create_router(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Start the server and run until shutdown
    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let router = self.router();

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        info!(addr = %addr, "API server listening");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.notified().await;
            })
            .await
            .context("Server error")?;

        Ok(())
    }

    /// Signal the server to shut down
    pub fn shutdown(&self) {
        info!("Shutting down API server");
        self.shutdown.notify_one();
    }
}
