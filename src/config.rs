//! Configuration management for the churn dashboard

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Prefix for environment overrides, e.g. `DROP_ALERT__ARTIFACTS__MODEL_PATH`
pub const ENV_PREFIX: &str = "DROP_ALERT";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub models: ModelsConfig,
    pub form: FormConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

/// Locations of the static artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Serialized ONNX classifier
    pub model_path: PathBuf,
    /// Training feature order sidecar (default: `feature_info.json` next to the model)
    pub feature_schema_path: Option<PathBuf>,
    /// Customer dataset used by the dashboard
    pub dataset_path: PathBuf,
}

impl ArtifactsConfig {
    /// Resolved location of the feature schema sidecar
    pub fn feature_schema_path(&self) -> PathBuf {
        self.feature_schema_path
            .clone()
            .unwrap_or_else(|| self.model_path.with_file_name("feature_info.json"))
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("artifacts/rf_model.onnx"),
            feature_schema_path: None,
            dataset_path: PathBuf::from("data/telecom_churn.csv"),
        }
    }
}

/// ONNX Runtime session settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Intra-op threads for the inference session
    pub onnx_threads: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Per-field bound overrides for the prediction form
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FormConfig {
    /// Keyed by feature name (e.g. `AccountWeeks`)
    pub bounds: HashMap<String, FieldBounds>,
}

impl FormConfig {
    /// Override for a field, matching the feature name case-insensitively
    pub fn bounds_for(&self, field: &str) -> Option<FieldBounds> {
        self.bounds
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, bounds)| *bounds)
    }
}

/// Minimum and/or maximum for one form field
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
pub struct FieldBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Dashboard rendering settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Bins for the monthly charge histogram
    pub histogram_bins: usize,
    /// Width of the longest bar, in characters
    pub bar_width: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            bar_width: 40,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// A missing default file is not an error; built-in defaults and
    /// environment overrides are used instead.
    pub fn load() -> Result<Self> {
        Self::build(File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false))
    }

    /// Load configuration from a specific path, which must exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        Self::build(File::from(path))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.artifacts.model_path, PathBuf::from("artifacts/rf_model.onnx"));
        assert_eq!(config.artifacts.dataset_path, PathBuf::from("data/telecom_churn.csv"));
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(config.dashboard.histogram_bins, 10);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.form.bounds.is_empty());
    }

    #[test]
    fn test_schema_path_defaults_next_to_model() {
        let artifacts = ArtifactsConfig {
            model_path: PathBuf::from("/opt/models/rf_model.onnx"),
            ..ArtifactsConfig::default()
        };
        assert_eq!(
            artifacts.feature_schema_path(),
            PathBuf::from("/opt/models/feature_info.json")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[artifacts]
model_path = "models/churn.onnx"

[form.bounds.AccountWeeks]
min = 0.0
max = 250.0

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.artifacts.model_path, PathBuf::from("models/churn.onnx"));
        assert_eq!(config.artifacts.dataset_path, PathBuf::from("data/telecom_churn.csv"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.form.bounds_for("AccountWeeks"),
            Some(FieldBounds {
                min: Some(0.0),
                max: Some(250.0)
            })
        );
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let result = AppConfig::load_from_path("does/not/exist.toml");
        assert!(result.is_err());
    }
}
