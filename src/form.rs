//! Prediction form: input bounds, feature assembly and label mapping

use crate::config::FormConfig;
use crate::error::{FormError, PredictError};
use crate::feature_extractor::{ChurnInput, FeatureExtractor, FEATURE_COUNT};
use crate::models::inference::ChurnClassifier;
use crate::types::prediction::ChurnLabel;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How a field is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole number
    Integer,
    /// Yes / No selection
    Flag,
    /// Decimal, shown with two places
    Decimal,
}

/// One labeled input of the form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Feature name in model input order
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub min: f64,
    pub max: Option<f64>,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            min: 0.0,
            max: None,
        }
    }

    /// Check a value against this field's bounds
    pub fn check(&self, value: f64) -> Result<(), FormError> {
        if !value.is_finite() {
            return Err(FormError::NotFinite { field: self.name });
        }
        // the model takes f32 inputs
        if !(value as f32).is_finite() {
            return Err(FormError::TooLarge {
                field: self.name,
                value,
            });
        }
        if value < self.min {
            return Err(FormError::BelowMinimum {
                field: self.name,
                value,
                min: self.min,
            });
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(FormError::AboveMaximum {
                    field: self.name,
                    value,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Form fields in model input order, with their default bounds
pub fn default_fields() -> [FieldSpec; FEATURE_COUNT] {
    [
        FieldSpec {
            max: Some(300.0),
            ..FieldSpec::new("AccountWeeks", "Account Weeks", FieldKind::Integer)
        },
        FieldSpec {
            max: Some(1.0),
            ..FieldSpec::new("ContractRenewal", "Contract Renewal", FieldKind::Flag)
        },
        FieldSpec {
            max: Some(1.0),
            ..FieldSpec::new("DataPlan", "Data Plan", FieldKind::Flag)
        },
        FieldSpec::new("DataUsage", "Data Usage (GB)", FieldKind::Decimal),
        FieldSpec::new("CustServCalls", "Customer Service Calls", FieldKind::Integer),
        FieldSpec::new("DayMins", "Day Minutes", FieldKind::Decimal),
        FieldSpec::new("DayCalls", "Day Calls", FieldKind::Integer),
        FieldSpec::new("MonthlyCharge", "Monthly Charge ($)", FieldKind::Decimal),
        FieldSpec::new("OverageFee", "Overage Fee ($)", FieldKind::Decimal),
        FieldSpec::new("RoamMins", "Roaming Minutes", FieldKind::Decimal),
    ]
}

/// Result of one form submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionOutcome {
    pub label: ChurnLabel,
    /// Time spent in the classifier
    pub latency: Duration,
}

impl PredictionOutcome {
    pub fn message(&self) -> &'static str {
        self.label.message()
    }
}

/// The inference form handler.
///
/// Holds no per-request state: every submission builds a fresh feature
/// vector and drops it after inference.
pub struct InferenceForm {
    fields: [FieldSpec; FEATURE_COUNT],
    extractor: FeatureExtractor,
}

impl InferenceForm {
    pub fn new() -> Self {
        Self {
            fields: default_fields(),
            extractor: FeatureExtractor::new(),
        }
    }

    /// Form with bound overrides applied; flag fields keep their 0/1 bounds.
    ///
    /// Every field stays non-negative: a lower minimum is raised to 0 and a
    /// maximum below the minimum is raised to the minimum.
    pub fn from_config(config: &FormConfig) -> Self {
        let mut form = Self::new();

        for name in config.bounds.keys() {
            if !form.fields.iter().any(|f| f.name.eq_ignore_ascii_case(name)) {
                warn!(field = %name, "Ignoring bounds for unknown form field");
            }
        }

        for field in form.fields.iter_mut() {
            if field.kind == FieldKind::Flag {
                continue;
            }
            if let Some(bounds) = config.bounds_for(field.name) {
                if let Some(min) = bounds.min {
                    if min < 0.0 {
                        warn!(field = field.name, min, "Negative form minimum raised to 0");
                    }
                    field.min = min.max(0.0);
                }
                if let Some(max) = bounds.max {
                    if max < field.min {
                        warn!(
                            field = field.name,
                            max,
                            min = field.min,
                            "Form maximum below minimum, raised to the minimum"
                        );
                    }
                    field.max = Some(max.max(field.min));
                }
                debug!(field = field.name, min = field.min, max = ?field.max, "Applied form bounds");
            }
        }

        form
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every field against its bounds
    pub fn validate(&self, input: &ChurnInput) -> Result<(), FormError> {
        for (spec, (_, value)) in self.fields.iter().zip(input.named_values()) {
            spec.check(value)?;
        }
        Ok(())
    }

    /// Validate, assemble the feature vector and classify it
    pub fn submit<C>(&self, classifier: &C, input: &ChurnInput) -> Result<PredictionOutcome, PredictError>
    where
        C: ChurnClassifier + ?Sized,
    {
        self.validate(input)?;

        let features = self.extractor.extract(input);
        debug!(
            features = ?features.named().collect::<Vec<_>>(),
            "Assembled feature vector"
        );

        let start = Instant::now();
        let label = classifier.predict(&features)?;
        let latency = start.elapsed();

        debug!(
            model = classifier.name(),
            label = label.class(),
            latency_us = latency.as_micros() as u64,
            "Prediction complete"
        );

        Ok(PredictionOutcome { label, latency })
    }
}

impl Default for InferenceForm {
    fn default() -> Self {
        Self::new()
    }
}
