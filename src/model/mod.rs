//! Model loading and classification

pub mod classifier;
pub mod loader;

pub use classifier::{Classification, SonarClassifier};
pub use loader::{LoadedModel, ModelLoader};

use serde::{Deserialize, Serialize};

/// The two classes the sonar model distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SonarClass {
    Rock,
    Mine,
}

impl SonarClass {
    /// Single-letter class code as emitted by the trained model ("R"/"M")
    pub fn code(&self) -> &'static str {
        match self {
            SonarClass::Rock => "R",
            SonarClass::Mine => "M",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SonarClass::Rock => "Rock",
            SonarClass::Mine => "Mine",
        }
    }

    /// Lowercase name used in sample endpoints ("rock"/"mine")
    pub fn name(&self) -> &'static str {
        match self {
            SonarClass::Rock => "rock",
            SonarClass::Mine => "mine",
        }
    }

    /// Parse a sample kind ("rock"/"mine", case-insensitive)
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind.trim().to_lowercase().as_str() {
            "rock" => Some(SonarClass::Rock),
            "mine" => Some(SonarClass::Mine),
            _ => None,
        }
    }
}
