//! Sonar Prediction Service - Main Entry Point
//!
//! Loads the sonar classifier once at startup and serves prediction
//! requests over HTTP. A missing or corrupt model artifact does not abort
//! startup; predictions then report model-unavailable.

use anyhow::Result;
use sonar_api::{
    api::{ApiServer, ApiState},
    config::AppConfig,
    metrics::MetricsReporter,
    model::{ModelLoader, SonarClassifier},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so the log level can come from it
    let config = AppConfig::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("sonar_api={}", config.logging.level))),
        )
        .init();

    info!("Starting Sonar Prediction Service");
    info!(
        model_path = %config.model.model_path,
        bind = %config.bind_addr(),
        "Configuration loaded"
    );

    // Load the model, tolerating a missing artifact
    let loader = ModelLoader::with_threads(config.model.onnx_threads)?;
    let classifier = loader
        .load_optional(&config.model.model_path)
        .map(|model| SonarClassifier::new(model, config.model.class_order.clone()));

    if classifier.is_none() {
        warn!("Serving without a model; predictions will report model_unavailable");
    }

    let state = ApiState::new(classifier);

    // Periodic metrics summary
    let metrics = state.metrics();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics, 60);
        reporter.start().await;
    });

    let server = Arc::new(ApiServer::new(config.server.clone(), state));

    // Shut down cleanly on ctrl-c
    let shutdown_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_server.shutdown();
        }
    });

    server.run().await?;

    info!("Service stopped");
    Ok(())
}
