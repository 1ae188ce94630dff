//! DropAlert Library
//!
//! Telecom churn insights: descriptive charts over a static customer
//! dataset and single-customer churn predictions from an ONNX classifier.

pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod feature_extractor;
pub mod form;
pub mod metrics;
pub mod models;
pub mod types;

pub use app::App;
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use dataset::ChurnDataset;
pub use error::{ArtifactUnavailable, FormError, PredictError};
pub use feature_extractor::{ChurnFeatureVector, ChurnInput, FeatureExtractor};
pub use form::InferenceForm;
pub use models::inference::{ChurnClassifier, ChurnModel};
pub use types::{customer::CustomerRecord, prediction::ChurnLabel};
