//! Typed, validated model input

use crate::api::error::ApiError;
use serde_json::Value;

/// Number of sonar energy readings in one measurement
pub const FEATURE_COUNT: usize = 60;

/// A validated feature vector: exactly 60 finite readings.
///
/// Construction goes through [`FeatureVector::parse`], so inference never
/// sees raw JSON values. Exists only within a single request.
#[derive(Debug, Clone)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// Parse the raw `features` field of a prediction request.
    ///
    /// Validation order: field presence, then value shape, then length,
    /// then element type. Only a JSON array of numbers is accepted;
    /// numeric strings are rejected.
    pub fn parse(features: Option<&Value>) -> Result<Self, ApiError> {
        let features = features
            .ok_or(ApiError::MissingInput)?
            .as_array()
            .ok_or(ApiError::NonNumericInput)?;

        if features.len() != FEATURE_COUNT {
            return Err(ApiError::InvalidLength {
                expected: FEATURE_COUNT,
                actual: features.len(),
            });
        }

        let mut values = Vec::with_capacity(FEATURE_COUNT);
        for value in features {
            let number = value
                .as_f64()
                .filter(|n| n.is_finite())
                .ok_or(ApiError::NonNumericInput)?;
            values.push(number as f32);
        }

        Ok(Self(values))
    }

    /// Build a vector from already-numeric readings (bundled samples)
    pub fn from_readings(readings: &[f64; FEATURE_COUNT]) -> Self {
        Self(readings.iter().map(|&r| r as f32).collect())
    }

    /// Readings in model input order
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}
