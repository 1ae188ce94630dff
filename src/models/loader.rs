//! ONNX model loader

use crate::error::{ArtifactKind, ArtifactUnavailable};
use crate::feature_extractor::{FEATURE_COUNT, FEATURE_NAMES};
use crate::models::schema::validate_feature_order;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{info, warn};

/// Loaded ONNX classifier with the names of its input and outputs
pub struct LoadedModel {
    /// Model name (artifact file stem)
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature tensor
    pub input_name: String,
    /// Integer class label output, if the model exposes one
    pub label_output: Option<String>,
    /// Class probability output, if the model exposes one
    pub probability_output: Option<String>,
}

/// Loader for the churn classifier artifact
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Check that the artifact exists and, when a feature schema sidecar is
    /// present, that it lists the expected input order.
    ///
    /// Runs before ONNX Runtime is touched.
    pub fn verify_artifact(
        &self,
        path: &Path,
        schema_path: &Path,
    ) -> Result<(), ArtifactUnavailable> {
        if !path.exists() {
            warn!(path = %path.display(), "Model file not found");
            return Err(ArtifactUnavailable::missing(ArtifactKind::Model, path));
        }
        if path.is_dir() {
            return Err(ArtifactUnavailable::corrupt(
                ArtifactKind::Model,
                path,
                "path is a directory",
            ));
        }

        validate_feature_order(schema_path, &FEATURE_NAMES)
    }

    /// Load the classifier from `path`, validating it against the sidecar at `schema_path`
    pub fn load_model(
        &self,
        path: &Path,
        schema_path: &Path,
    ) -> Result<LoadedModel, ArtifactUnavailable> {
        self.verify_artifact(path, schema_path)?;

        let corrupt =
            |reason: String| ArtifactUnavailable::corrupt(ArtifactKind::Model, path, reason);

        ort::init().commit().map_err(|e| corrupt(e.to_string()))?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "churn_model".to_string());

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| corrupt(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| corrupt(e.to_string()))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| corrupt(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| corrupt(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        if let Some(dims) = session
            .inputs
            .first()
            .and_then(|i| i.input_type.tensor_shape())
        {
            check_input_width(dims).map_err(corrupt)?;
        }

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone());

        if label_output.is_none() && probability_output.is_none() {
            return Err(ArtifactUnavailable::corrupt(
                ArtifactKind::Model,
                path,
                "model exposes neither a label nor a probability output",
            ));
        }

        info!(
            model = %name,
            input = %input_name,
            label_output = ?label_output,
            probability_output = ?probability_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name,
            session,
            input_name,
            label_output,
            probability_output,
        })
    }
}

/// The feature axis must be dynamic or exactly [`FEATURE_COUNT`] wide
fn check_input_width(dims: &[i64]) -> Result<(), String> {
    match dims.last() {
        Some(&width) if width >= 0 && width as usize != FEATURE_COUNT => Err(format!(
            "model expects {} input features, the form provides {}",
            width, FEATURE_COUNT
        )),
        _ => Ok(()),
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("rf_model.onnx");
        let schema = dir.path().join("feature_info.json");

        let err = ModelLoader::new().load_model(&model, &schema).err().unwrap();
        assert!(matches!(
            err,
            ArtifactUnavailable::Missing { kind: ArtifactKind::Model, .. }
        ));
    }

    #[test]
    fn test_directory_is_not_a_model() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("feature_info.json");

        let err = ModelLoader::new()
            .verify_artifact(dir.path(), &schema)
            .unwrap_err();
        assert!(err.to_string().contains("path is a directory"));
    }

    #[test]
    fn test_schema_mismatch_blocks_loading() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("rf_model.onnx");
        std::fs::write(&model, b"placeholder").unwrap();

        let schema = dir.path().join("feature_info.json");
        let mut file = std::fs::File::create(&schema).unwrap();
        write!(file, r#"{{"feature_names": ["AccountWeeks"]}}"#).unwrap();

        let err = ModelLoader::new()
            .verify_artifact(&model, &schema)
            .unwrap_err();
        assert!(matches!(err, ArtifactUnavailable::FeatureSchemaMismatch { .. }));
    }

    #[test]
    fn test_thread_count_is_at_least_one() {
        assert_eq!(ModelLoader::with_threads(0).onnx_threads, 1);
    }

    #[test]
    fn test_unparseable_model_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("rf_model.onnx");
        std::fs::write(&model, b"\x00\x01 not an onnx graph \xff\xfe").unwrap();
        let schema = dir.path().join("feature_info.json");

        let err = ModelLoader::new().load_model(&model, &schema).err().unwrap();
        assert!(matches!(
            err,
            ArtifactUnavailable::Corrupt { kind: ArtifactKind::Model, .. }
        ));
    }

    #[test]
    fn test_input_width_check() {
        assert!(check_input_width(&[1, 10]).is_ok());
        assert!(check_input_width(&[-1, 10]).is_ok());
        assert!(check_input_width(&[-1, -1]).is_ok());
        assert!(check_input_width(&[]).is_ok());

        let err = check_input_width(&[1, 9]).unwrap_err();
        assert!(err.contains("model expects 9 input features"));
    }
}
