//! API error taxonomy and status-code mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// API error types.
///
/// The first four are client-caused and map to 400; the rest are
/// server-caused and map to 500. Validation errors are produced at the
/// boundary before any inference runs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Prediction request without a features field
    #[error("Please provide 60 sonar readings")]
    MissingInput,

    /// Feature vector with the wrong number of readings
    #[error("Expected {expected} features, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Feature vector with a non-numeric or non-finite element
    #[error("All features must be finite numeric values")]
    NonNumericInput,

    /// Unknown sample kind
    #[error("Unknown sample type {0:?}, use \"rock\" or \"mine\"")]
    InvalidSampleType(String),

    /// No model was loaded at startup
    #[error("Model is not loaded, ensure the model artifact is present")]
    ModelUnavailable,

    /// Inference failed after validation passed
    #[error("Prediction failed")]
    Inference(#[from] anyhow::Error),
}

impl ApiError {
    /// Short machine-readable kind tag carried in the error body
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingInput => "missing_input",
            ApiError::InvalidLength { .. } => "invalid_length",
            ApiError::NonNumericInput => "non_numeric_input",
            ApiError::InvalidSampleType(_) => "invalid_sample_type",
            ApiError::ModelUnavailable => "model_unavailable",
            ApiError::Inference(_) => "prediction_failed",
        }
    }

    /// Transport status for the error class
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput
            | ApiError::InvalidLength { .. }
            | ApiError::NonNumericInput
            | ApiError::InvalidSampleType(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable | ApiError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Structured error body: kind tag plus human message, never a stack trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The caller sees the taxonomy message; internal detail stays in logs
        if let ApiError::Inference(ref source) = self {
            error!(error = %source, "Inference failed");
        }

        let body = Json(ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        });

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let errors = [
            ApiError::MissingInput,
            ApiError::InvalidLength {
                expected: 60,
                actual: 3,
            },
            ApiError::NonNumericInput,
            ApiError::InvalidSampleType("other".to_string()),
        ];
        for err in errors {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_server_errors_map_to_internal() {
        assert_eq!(
            ApiError::ModelUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let err = ApiError::Inference(anyhow::anyhow!("session exploded"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_length_message_reports_both_counts() {
        let err = ApiError::InvalidLength {
            expected: 60,
            actual: 61,
        };
        let message = err.to_string();
        assert!(message.contains("60"));
        assert!(message.contains("61"));
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ApiError::MissingInput.kind(), "missing_input");
        assert_eq!(ApiError::ModelUnavailable.kind(), "model_unavailable");
        assert_eq!(
            ApiError::InvalidSampleType("x".to_string()).kind(),
            "invalid_sample_type"
        );
    }

    #[test]
    fn test_inference_error_hides_internal_detail() {
        let err = ApiError::Inference(anyhow::anyhow!("lock poisoned at 0xdeadbeef"));
        assert_eq!(err.to_string(), "Prediction failed");
    }
}
