//! Sonar Rock-vs-Mine Prediction Service
//!
//! Loads a pre-trained binary classifier once at startup and answers
//! stateless JSON prediction requests against it.

pub mod api;
pub mod config;
pub mod metrics;
pub mod model;
pub mod samples;
pub mod types;

pub use api::{ApiServer, ApiState};
pub use config::AppConfig;
pub use model::{ModelLoader, SonarClass, SonarClassifier};
pub use types::{FeatureVector, ModelStatsReport, PredictRequest, PredictResponse};
