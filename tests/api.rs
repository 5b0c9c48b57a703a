//! End-to-end tests for the prediction API
//!
//! Spins up a real HTTP server per test. Validation and error-path tests
//! run without a model artifact; regression tests against the bundled model
//! skip when `models/sonar.onnx` is absent.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use sonar_api::api::ApiState;
use sonar_api::config::AppConfig;
use sonar_api::model::{ModelLoader, SonarClassifier};

const MODEL_PATH: &str = "models/sonar.onnx";

/// Test server helper
struct TestServer {
    addr: SocketAddr,
    client: Client,
}

impl TestServer {
    /// Spawn a server without a loaded model
    async fn without_model() -> Self {
        Self::spawn(ApiState::new(None)).await
    }

    /// Spawn a server with the bundled model, or None if the artifact
    /// is absent
    async fn with_model() -> Option<Self> {
        if !Path::new(MODEL_PATH).exists() {
            eprintln!("skipping: {MODEL_PATH} not present");
            return None;
        }

        let config = AppConfig::default();
        let loader = ModelLoader::with_threads(1).unwrap();
        let model = loader.load_optional(MODEL_PATH)?;
        let classifier = SonarClassifier::new(model, config.model.class_order);

        Some(Self::spawn(ApiState::new(Some(classifier))).await)
    }

    async fn spawn(state: ApiState) -> Self {
        let router = sonar_api::api::create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        Self { addr, client }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

fn valid_features() -> Vec<Value> {
    (0..60).map(|i| json!(i as f64 / 100.0)).collect()
}

// =============================================================================
// Health and stats
// =============================================================================

#[tokio::test]
async fn health_reports_model_not_loaded() {
    let server = TestServer::without_model().await;

    let (status, body) = server.get("/api/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_is_stable_across_calls() {
    let server = TestServer::without_model().await;

    for _ in 0..3 {
        let (status, body) = server.get("/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["model_loaded"], false);
    }
}

#[tokio::test]
async fn stats_returns_static_record() {
    let server = TestServer::without_model().await;

    let first = server
        .client
        .get(server.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let second = server
        .client
        .get(server.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(first, second);

    let body: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(body["features"], 60);
    assert_eq!(body["total_samples"], 208);
    assert_eq!(body["rock_samples"], 97);
    assert_eq!(body["mine_samples"], 111);
}

#[tokio::test]
async fn landing_page_renders() {
    let server = TestServer::without_model().await;

    let resp = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("Sonar"));
}

// =============================================================================
// Samples
// =============================================================================

#[tokio::test]
async fn samples_are_deterministic_and_labeled() {
    let server = TestServer::without_model().await;

    for (kind, label) in [("rock", "R"), ("mine", "M")] {
        let (status, first) = server.get(&format!("/api/sample/{kind}")).await;
        let (_, second) = server.get(&format!("/api/sample/{kind}")).await;

        assert_eq!(status, 200);
        assert_eq!(first, second);
        assert_eq!(first["type"], kind);
        assert_eq!(first["label"], label);
        assert_eq!(first["features"].as_array().unwrap().len(), 60);
    }
}

#[tokio::test]
async fn sample_kind_is_case_insensitive() {
    let server = TestServer::without_model().await;

    for kind in ["Rock", "ROCK", "rOcK"] {
        let (status, body) = server.get(&format!("/api/sample/{kind}")).await;
        assert_eq!(status, 200);
        assert_eq!(body["type"], "rock");
    }
}

#[tokio::test]
async fn unknown_sample_kind_is_rejected() {
    let server = TestServer::without_model().await;

    let (status, body) = server.get("/api/sample/submarine").await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_sample_type");
    assert!(body["message"].as_str().unwrap().contains("rock"));
}

// =============================================================================
// Prediction validation
// =============================================================================

#[tokio::test]
async fn predict_rejects_missing_features() {
    let server = TestServer::without_model().await;

    let (status, body) = server.post("/api/predict", json!({})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "missing_input");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn predict_rejects_wrong_lengths() {
    let server = TestServer::without_model().await;

    for count in [0usize, 3, 61] {
        let features: Vec<Value> = (0..count).map(|_| json!(0.1)).collect();
        let (status, body) = server
            .post("/api/predict", json!({ "features": features }))
            .await;

        assert_eq!(status, 400, "length {count}");
        assert_eq!(body["error"], "invalid_length");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("60"), "message: {message}");
        assert!(message.contains(&count.to_string()), "message: {message}");
    }
}

#[tokio::test]
async fn predict_rejects_non_numeric_elements() {
    let server = TestServer::without_model().await;

    let mut features = valid_features();
    features[42] = json!("0.5");

    let (status, body) = server
        .post("/api/predict", json!({ "features": features }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "non_numeric_input");
}

#[tokio::test]
async fn predict_rejects_non_array_features() {
    let server = TestServer::without_model().await;

    // Ill-typed but well-formed bodies stay inside the error taxonomy
    // rather than falling through to an extractor rejection
    for features in [json!("abc"), json!(5), json!({ "a": 1 })] {
        let (status, body) = server
            .post("/api/predict", json!({ "features": features }))
            .await;

        assert_eq!(status, 400, "features: {features}");
        assert_eq!(body["error"], "non_numeric_input");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn predict_without_model_reports_unavailable() {
    let server = TestServer::without_model().await;

    // Input is fully valid; the model-presence check comes after validation
    let (status, body) = server
        .post("/api/predict", json!({ "features": valid_features() }))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "model_unavailable");
}

#[tokio::test]
async fn validation_precedes_model_check() {
    let server = TestServer::without_model().await;

    // Bad input on a model-less server reports the input problem, not
    // model_unavailable
    let (status, body) = server
        .post("/api/predict", json!({ "features": [1, 2, 3] }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_length");
}

// =============================================================================
// Regression against the bundled model (skip when artifact absent)
// =============================================================================

#[tokio::test]
async fn reference_samples_round_trip_through_predict() {
    let Some(server) = TestServer::with_model().await else {
        return;
    };

    for (kind, expected_code, expected_label) in [("rock", "R", "Rock"), ("mine", "M", "Mine")] {
        let (_, sample) = server.get(&format!("/api/sample/{kind}")).await;

        let (status, body) = server
            .post("/api/predict", json!({ "features": sample["features"] }))
            .await;

        assert_eq!(status, 200, "{kind}");
        assert_eq!(body["prediction"], expected_code);
        assert_eq!(body["prediction_label"], expected_label);
        assert_eq!(
            body["message"],
            format!("The object is a {expected_label}")
        );
    }
}

#[tokio::test]
async fn confidence_percentages_sum_to_hundred() {
    let Some(server) = TestServer::with_model().await else {
        return;
    };

    for kind in ["rock", "mine"] {
        let (_, sample) = server.get(&format!("/api/sample/{kind}")).await;
        let (status, body) = server
            .post("/api/predict", json!({ "features": sample["features"] }))
            .await;

        assert_eq!(status, 200);
        let rock = body["confidence"]["rock"].as_f64().unwrap();
        let mine = body["confidence"]["mine"].as_f64().unwrap();
        assert!(rock >= 0.0 && mine >= 0.0);
        assert!((rock + mine - 100.0).abs() <= 0.01, "rock={rock} mine={mine}");
    }
}

#[tokio::test]
async fn health_reports_model_loaded() {
    let Some(server) = TestServer::with_model().await else {
        return;
    };

    let (status, body) = server.get("/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["model_loaded"], true);
}
