//! Error types for artifact loading, form input and inference

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which static artifact an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Dataset,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => f.write_str("model"),
            ArtifactKind::Dataset => f.write_str("dataset"),
        }
    }
}

/// A static artifact (model or dataset) could not be made available.
///
/// Raised once at startup; the application keeps running and shows it in
/// place of the part of the page that depends on the artifact.
#[derive(Debug, Clone, Error)]
pub enum ArtifactUnavailable {
    #[error("{kind} artifact not found at {}", path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },

    #[error("{kind} artifact at {} could not be read: {reason}", path.display())]
    Corrupt {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error("feature schema at {} does not match the model input order: {reason}", path.display())]
    FeatureSchemaMismatch { path: PathBuf, reason: String },
}

impl ArtifactUnavailable {
    pub fn missing(kind: ArtifactKind, path: impl Into<PathBuf>) -> Self {
        ArtifactUnavailable::Missing {
            kind,
            path: path.into(),
        }
    }

    pub fn corrupt(kind: ArtifactKind, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ArtifactUnavailable::Corrupt {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The artifact this error refers to
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactUnavailable::Missing { kind, .. } | ArtifactUnavailable::Corrupt { kind, .. } => {
                *kind
            }
            ArtifactUnavailable::FeatureSchemaMismatch { .. } => ArtifactKind::Model,
        }
    }
}

/// Input rejected at the form boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },

    #[error("{field} must be at most {max}, got {value}")]
    AboveMaximum {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} is too large for the model input, got {value}")]
    TooLarge { field: &'static str, value: f64 },

    #[error("expected Yes or No, got {0:?}")]
    InvalidYesNo(String),
}

/// Failure to produce a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction is unavailable: {0}")]
    ModelUnavailable(#[from] ArtifactUnavailable),

    #[error(transparent)]
    InvalidInput(#[from] FormError),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model returned class label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),

    #[error("model produced no usable class output")]
    NoOutput,
}
