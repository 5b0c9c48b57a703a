//! Request and response types for the prediction API

pub mod features;

pub use features::{FeatureVector, FEATURE_COUNT};

use crate::model::Classification;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a prediction request.
///
/// `features` stays as one raw JSON value here, so an ill-typed field
/// (string, number, object) still deserializes and reaches the typed parse
/// into a [`FeatureVector`], which reports it through the error taxonomy
/// instead of an extractor rejection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PredictRequest {
    #[serde(default)]
    pub features: Option<Value>,
}

/// Per-class confidence, as percentages summing to 100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confidence {
    pub rock: f64,
    pub mine: f64,
}

/// Successful prediction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Raw class code from the model ("R"/"M")
    pub prediction: String,
    /// Human-readable label ("Rock"/"Mine")
    pub prediction_label: String,
    pub confidence: Confidence,
    pub message: String,
}

impl PredictResponse {
    /// Build the response body from a classification result
    pub fn from_classification(classification: &Classification) -> Self {
        let class = classification.class;
        Self {
            prediction: class.code().to_string(),
            prediction_label: class.label().to_string(),
            confidence: Confidence {
                rock: round2(classification.rock_probability * 100.0),
                mine: round2(classification.mine_probability * 100.0),
            },
            message: format!("The object is a {}", class.label()),
        }
    }
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Static model statistics, fixed at deploy time.
///
/// Recorded from the training run that produced the bundled artifact; not
/// derived from the loaded model at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelStatsReport {
    pub training_accuracy: f64,
    pub test_accuracy: f64,
    pub total_samples: u32,
    pub training_samples: u32,
    pub test_samples: u32,
    pub features: u32,
    pub rock_samples: u32,
    pub mine_samples: u32,
}

impl ModelStatsReport {
    /// The statistics record for the bundled sonar model
    pub const fn bundled() -> Self {
        Self {
            training_accuracy: 83.42,
            test_accuracy: 76.19,
            total_samples: 208,
            training_samples: 187,
            test_samples: 21,
            features: 60,
            rock_samples: 97,
            mine_samples: 111,
        }
    }
}

/// Reference sample response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<f64>,
    /// Known true label for the sample ("R"/"M")
    pub label: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}
