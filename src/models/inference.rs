//! Churn inference over the loaded ONNX classifier

use crate::config::AppConfig;
use crate::error::{ArtifactUnavailable, PredictError};
use crate::feature_extractor::ChurnFeatureVector;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::prediction::ChurnLabel;
use ort::memory::Allocator;
use ort::session::SessionOutputs;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Probability at or above which the class-1 score counts as churn
pub const CHURN_PROBABILITY_CUTOFF: f64 = 0.5;

/// Anything that maps a feature vector to a churn label.
pub trait ChurnClassifier {
    fn predict(&self, features: &ChurnFeatureVector) -> Result<ChurnLabel, PredictError>;

    /// Name shown in logs
    fn name(&self) -> &str;
}

/// ONNX-backed churn classifier.
///
/// ONNX Runtime needs exclusive access to run a session, so the session sits
/// behind a mutex. Only one prediction is ever in flight.
pub struct ChurnModel {
    name: String,
    model: Mutex<LoadedModel>,
}

impl ChurnModel {
    /// Load the classifier named in the configuration
    pub fn load(config: &AppConfig) -> Result<Self, ArtifactUnavailable> {
        let loader = ModelLoader::with_threads(config.models.onnx_threads);
        let model = loader.load_model(
            &config.artifacts.model_path,
            &config.artifacts.feature_schema_path(),
        )?;
        Ok(Self::from_loaded(model))
    }

    pub fn from_loaded(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }

    /// Run the session and decode a raw class label
    fn run_class(&self, features: &ChurnFeatureVector) -> Result<i64, PredictError> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| PredictError::Inference(format!("Lock error: {}", e)))?;
        let model = &mut *model;

        // Input tensor of shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.as_slice().to_vec()))
            .map_err(|e| PredictError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let outputs = model
            .session
            .run(ort::inputs![model.input_name.as_str() => input_tensor])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        if let Some(label_output) = &model.label_output {
            if let Some(class) = extract_label(&outputs, label_output) {
                debug!(model = %self.name, class, "Extracted class label");
                return Ok(class);
            }
        }

        if let Some(probability_output) = &model.probability_output {
            if let Some(probability) = extract_probability(&outputs, probability_output) {
                debug!(model = %self.name, probability, "Extracted churn probability");
                return Ok(i64::from(probability >= CHURN_PROBABILITY_CUTOFF));
            }
        }

        Err(PredictError::NoOutput)
    }
}

impl ChurnClassifier for ChurnModel {
    fn predict(&self, features: &ChurnFeatureVector) -> Result<ChurnLabel, PredictError> {
        let class = self.run_class(features)?;
        ChurnLabel::from_class(class).ok_or(PredictError::UnexpectedLabel(class))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// First element of an integer label tensor
fn extract_label(outputs: &SessionOutputs, output_name: &str) -> Option<i64> {
    let output = outputs.get(output_name)?;
    let (_, data) = output.try_extract_tensor::<i64>().ok()?;
    data.first().copied()
}

/// Class-1 probability from a probability output.
///
/// Handles both a float tensor and the `seq(map(int64, float))` layout that
/// scikit-learn tree ensembles export to.
fn extract_probability(outputs: &SessionOutputs, output_name: &str) -> Option<f64> {
    let output = outputs.get(output_name)?;

    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return churn_prob_from_tensor(&dims, data);
    }

    if DynSequenceValueType::can_downcast(&output.dtype()) {
        return churn_prob_from_sequence_map(output);
    }

    None
}

fn churn_prob_from_sequence_map(output: &DynValue) -> Option<f64> {
    let allocator = Allocator::default();
    let sequence = output.downcast_ref::<DynSequenceValueType>().ok()?;
    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .ok()?;

    // batch size is always 1
    let pairs = maps.first()?.try_extract_key_values::<i64, f32>().ok()?;

    if let Some((_, prob)) = pairs.iter().find(|(class, _)| *class == 1) {
        return Some(*prob as f64);
    }
    pairs
        .iter()
        .find(|(class, _)| *class == 0)
        .map(|(_, prob)| 1.0 - *prob as f64)
}

/// Class-1 probability from a `[batch, classes]` or `[classes]` tensor
fn churn_prob_from_tensor(dims: &[i64], data: &[f32]) -> Option<f64> {
    let classes = dims.last().copied().unwrap_or(0);
    match classes {
        c if c >= 2 => data.get(1).map(|&p| p as f64),
        1 => data.first().map(|&p| p as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor_uses_class_one() {
        let prob = churn_prob_from_tensor(&[1, 2], &[0.3, 0.7]).unwrap();
        assert!((prob - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_single_probability_tensor() {
        let prob = churn_prob_from_tensor(&[1, 1], &[0.25]).unwrap();
        assert!((prob - 0.25).abs() < 1e-6);

        let prob = churn_prob_from_tensor(&[2], &[0.9, 0.1]).unwrap();
        assert!((prob - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_empty_tensor_has_no_probability() {
        assert_eq!(churn_prob_from_tensor(&[1, 0], &[]), None);
        assert_eq!(churn_prob_from_tensor(&[1, 2], &[0.5]), None);
    }
}
