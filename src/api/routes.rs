//! API route handlers

use crate::api::error::ApiError;
use crate::metrics::ServiceMetrics;
use crate::model::{SonarClass, SonarClassifier};
use crate::samples;
use crate::types::{
    FeatureVector, HealthResponse, ModelStatsReport, PredictRequest, PredictResponse,
    SampleResponse,
};
use axum::{
    extract::{Path, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Shared application state, constructed once at startup and injected into
/// every handler. The classifier is absent when the startup load failed.
#[derive(Clone)]
pub struct ApiState {
    classifier: Option<Arc<SonarClassifier>>,
    metrics: Arc<ServiceMetrics>,
}

impl ApiState {
    /// Create state around an optionally loaded classifier
    pub fn new(classifier: Option<SonarClassifier>) -> Self {
        Self {
            classifier: classifier.map(Arc::new),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    /// Whether the startup model load succeeded
    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Service metrics handle
    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        self.metrics.clone()
    }
}

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/sample/{kind}", get(sample_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Sonar Rock vs Mine Detection</title></head>
<body>
<h1>Sonar Rock vs Mine Detection</h1>
<p>POST 60 sonar readings to <code>/api/predict</code> as
<code>{"features": [...]}</code>.</p>
<p>See <code>/api/stats</code>, <code>/api/sample/rock</code>,
<code>/api/sample/mine</code> and <code>/api/health</code>.</p>
</body>
</html>
"#;

/// Landing page
async fn home_handler() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Predict whether the sonar readings indicate a rock or a mine.
///
/// Input is validated before the model-presence check, so malformed
/// requests report their own problem even when no model is loaded.
async fn predict_handler(
    State(state): State<ApiState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start_time = Instant::now();

    let vector = FeatureVector::parse(request.features.as_ref()).inspect_err(|e| {
        state.metrics.record_rejection();
        debug!(error = %e, "Rejected prediction request");
    })?;

    let classifier = state.classifier.as_ref().ok_or(ApiError::ModelUnavailable)?;

    let classification = classifier.classify(&vector)?;

    state
        .metrics
        .record_prediction(start_time.elapsed(), classification.class);

    info!(
        prediction = classification.class.code(),
        rock = classification.rock_probability,
        mine = classification.mine_probability,
        latency_us = start_time.elapsed().as_micros() as u64,
        "Prediction served"
    );

    Ok(Json(PredictResponse::from_classification(&classification)))
}

/// Static model statistics
async fn stats_handler() -> Json<ModelStatsReport> {
    Json(ModelStatsReport::bundled())
}

/// Bundled reference sample for a class kind ("rock"/"mine", case-insensitive)
async fn sample_handler(
    Path(kind): Path<String>,
) -> Result<Json<SampleResponse>, ApiError> {
    let class =
        SonarClass::from_kind(&kind).ok_or_else(|| ApiError::InvalidSampleType(kind.clone()))?;

    Ok(Json(SampleResponse {
        kind: class.name().to_string(),
        features: samples::reference(class).to_vec(),
        label: class.code().to_string(),
    }))
}

/// Health check. Never fails; reports whether the model load succeeded.
async fn health_handler(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model_loaded(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_without_model() {
        let state = ApiState::new(None);
        assert!(!state.model_loaded());
    }

    #[test]
    fn test_router_builds() {
        let router = create_router(ApiState::new(None));
        assert!(format!("{:?}", router).contains("Router"));
    }
}
