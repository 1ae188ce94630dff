//! Training feature order sidecar (`feature_info.json`)

use crate::error::{ArtifactKind, ArtifactUnavailable};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Feature order the classifier was trained on
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeatureSchema {
    pub feature_names: Vec<String>,
}

impl FeatureSchema {
    /// Read the sidecar if it exists.
    ///
    /// Returns `Ok(None)` when there is no file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ArtifactUnavailable> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| ArtifactUnavailable::corrupt(ArtifactKind::Model, path, e))?;
        let schema = serde_json::from_str(&raw)
            .map_err(|e| ArtifactUnavailable::corrupt(ArtifactKind::Model, path, e))?;

        Ok(Some(schema))
    }

    /// Compare against the expected input order, describing the first difference
    pub fn check(&self, expected: &[&str]) -> Result<(), String> {
        if self.feature_names.len() != expected.len() {
            return Err(format!(
                "expected {} features, artifact lists {}",
                expected.len(),
                self.feature_names.len()
            ));
        }

        for (position, (trained, wanted)) in self.feature_names.iter().zip(expected).enumerate() {
            if trained != wanted {
                return Err(format!(
                    "position {} is {}, artifact was trained with {}",
                    position + 1,
                    wanted,
                    trained
                ));
            }
        }

        Ok(())
    }
}

/// Validate the sidecar at `path` against `expected`.
///
/// A missing sidecar only logs a warning; an unreadable or mismatching one
/// makes the model unavailable.
pub fn validate_feature_order(path: &Path, expected: &[&str]) -> Result<(), ArtifactUnavailable> {
    match FeatureSchema::load(path)? {
        Some(schema) => {
            schema
                .check(expected)
                .map_err(|reason| ArtifactUnavailable::FeatureSchemaMismatch {
                    path: path.to_path_buf(),
                    reason,
                })?;
            info!(path = %path.display(), "Feature order matches training schema");
            Ok(())
        }
        None => {
            warn!(
                path = %path.display(),
                "No feature schema found, feature order is not verified"
            );
            Ok(())
        }
    }
}
