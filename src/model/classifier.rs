//! Sonar classifier built on the loaded ONNX session

use crate::model::loader::LoadedModel;
use crate::model::SonarClass;
use crate::types::features::FeatureVector;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

/// Result of running the classifier on one feature vector
#[derive(Debug, Clone)]
pub struct Classification {
    /// Predicted class
    pub class: SonarClass,
    /// Probability of the rock class (0.0 - 1.0)
    pub rock_probability: f64,
    /// Probability of the mine class (0.0 - 1.0)
    pub mine_probability: f64,
}

/// Immutable classifier wrapping the single loaded model.
///
/// `Session::run` needs exclusive access, so the model sits behind an RwLock;
/// everything else about the classifier is read-only after construction.
pub struct SonarClassifier {
    model: RwLock<LoadedModel>,
    /// Class codes in output index order, for tensor-shaped probability
    /// outputs that do not name their classes
    class_order: Vec<String>,
}

impl SonarClassifier {
    /// Wrap a loaded model with the configured class order
    pub fn new(model: LoadedModel, class_order: Vec<String>) -> Self {
        Self {
            model: RwLock::new(model),
            class_order,
        }
    }

    /// Classify a validated feature vector.
    ///
    /// The predicted class is the probability argmax, so prediction and
    /// confidence always agree.
    pub fn classify(&self, features: &FeatureVector) -> Result<Classification> {
        let probabilities = self.run_session(features)?;

        let rock_probability = probabilities
            .get(SonarClass::Rock.code())
            .copied()
            .context("Model output carries no rock class probability")?;
        let mine_probability = probabilities
            .get(SonarClass::Mine.code())
            .copied()
            .context("Model output carries no mine class probability")?;

        let class = if rock_probability >= mine_probability {
            SonarClass::Rock
        } else {
            SonarClass::Mine
        };

        debug!(
            class = class.code(),
            rock = rock_probability,
            mine = mine_probability,
            "Classification complete"
        );

        Ok(Classification {
            class,
            rock_probability,
            mine_probability,
        })
    }

    /// Run the session and extract per-class probabilities keyed by class code
    fn run_session(&self, features: &FeatureVector) -> Result<HashMap<String, f64>> {
        use ort::value::Tensor;

        let values = features.as_slice().to_vec();
        let shape = vec![1_i64, values.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, values)).context("Failed to create input tensor")?;

        let mut model = self
            .model
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model.session.run(ort::inputs![&input_name => input_tensor])?;

        self.extract_probabilities(&outputs, &output_name)
    }

    /// Extract class probabilities from model output.
    ///
    /// Handles both seq(map) outputs (sklearn ZipMap export, keys are the
    /// class labels) and plain tensor outputs (keys taken from the configured
    /// class order).
    fn extract_probabilities(
        &self,
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
    ) -> Result<HashMap<String, f64>> {
        // First, try the probability output resolved at load time
        if let Some(output) = outputs.get(output_name) {
            let dtype = output.dtype();

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(probs) = self.extract_from_sequence_map(output) {
                    return Ok(probs);
                }
            }

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                return self.extract_from_tensor(&shape, data);
            }
        }

        // Fallback: iterate all outputs and try extraction
        for (name, output) in outputs.iter() {
            // Skip the label output
            if name.contains("label") {
                continue;
            }

            let dtype = output.dtype();

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(probs) = self.extract_from_sequence_map(&output) {
                    debug!(output = %name, "Extracted probabilities (fallback)");
                    return Ok(probs);
                }
            }

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                debug!(output = %name, "Extracted probability tensor (fallback)");
                return self.extract_from_tensor(&shape, data);
            }
        }

        anyhow::bail!("Could not extract class probabilities from model output")
    }

    /// Extract probabilities from a seq(map) output.
    ///
    /// sklearn exports with string labels produce seq(map(string, float))
    /// keyed by the labels themselves; integer-labelled exports produce
    /// seq(map(int64, float)) and fall back to the configured class order.
    fn extract_from_sequence_map(
        &self,
        output: &ort::value::DynValue,
    ) -> Result<HashMap<String, f64>> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        if maps.is_empty() {
            anyhow::bail!("Empty sequence");
        }

        // Batch size is 1; the first map holds the class probabilities
        let map_value = &maps[0];

        // String-keyed map: the model names its own classes
        if let Ok(kv_pairs) = map_value.try_extract_key_values::<String, f32>() {
            let mut probs = HashMap::new();
            for (class_code, prob) in kv_pairs {
                probs.insert(class_code.trim().to_uppercase(), prob as f64);
            }
            debug!(classes = probs.len(), "Extracted from seq(map), string keys");
            return Ok(probs);
        }

        // Integer-keyed map: indices resolve through the configured order
        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;
        let mut probs = HashMap::new();
        for (class_index, prob) in kv_pairs {
            if let Some(code) = self.class_order.get(class_index as usize) {
                probs.insert(code.clone(), prob as f64);
            } else {
                warn!(class_index, "Class index outside configured class order");
            }
        }
        debug!(classes = probs.len(), "Extracted from seq(map), int keys");
        Ok(probs)
    }

    /// Extract probabilities from a `[1, n]` or `[n]` tensor using the
    /// configured class order
    fn extract_from_tensor(
        &self,
        shape: &ort::tensor::Shape,
        data: &[f32],
    ) -> Result<HashMap<String, f64>> {
        let dims: Vec<i64> = shape.iter().copied().collect();

        let num_classes = match dims.len() {
            2 => dims[1] as usize,
            1 => dims[0] as usize,
            _ => anyhow::bail!("Unexpected probability tensor shape {:?}", dims),
        };

        if num_classes != self.class_order.len() || data.len() < num_classes {
            anyhow::bail!(
                "Probability tensor has {} classes, configured class order has {}",
                num_classes,
                self.class_order.len()
            );
        }

        let mut probs = HashMap::new();
        for (code, &prob) in self.class_order.iter().zip(data.iter()) {
            probs.insert(code.clone(), prob as f64);
        }
        Ok(probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_argmax_agrees_with_probabilities() {
        let classification = Classification {
            class: SonarClass::Mine,
            rock_probability: 0.12,
            mine_probability: 0.88,
        };

        assert_eq!(classification.class, SonarClass::Mine);
        assert!(classification.mine_probability > classification.rock_probability);
    }

    // Classification against the real artifact is covered by the
    // integration suite in tests/api.rs, which skips when the model
    // file is absent.
}
