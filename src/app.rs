//! Application state: artifacts loaded once at startup plus the form handler

use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::dataset::ChurnDataset;
use crate::error::{ArtifactUnavailable, PredictError};
use crate::feature_extractor::ChurnInput;
use crate::form::{InferenceForm, PredictionOutcome};
use crate::metrics::SessionMetrics;
use crate::models::inference::{ChurnClassifier, ChurnModel};
use tracing::{debug, error, info, warn};

/// Everything the page needs for the lifetime of the process.
///
/// Artifact failures are kept as values so the page can start without them
/// and show the error where the artifact would have been used.
pub struct App {
    config: AppConfig,
    model: Result<Box<dyn ChurnClassifier>, ArtifactUnavailable>,
    dataset: Result<ChurnDataset, ArtifactUnavailable>,
    form: InferenceForm,
    metrics: SessionMetrics,
}

impl App {
    /// Load both artifacts. Never fails; see [`App::model`] and [`App::dataset`].
    pub fn start(config: AppConfig) -> Self {
        let model = ChurnModel::load(&config)
            .map(|model| Box::new(model) as Box<dyn ChurnClassifier>);
        if let Err(e) = &model {
            error!(error = %e, "Churn model unavailable, predictions are disabled");
        }

        let dataset = ChurnDataset::load(&config.artifacts.dataset_path);
        if let Err(e) = &dataset {
            error!(error = %e, "Dataset unavailable, dashboard is disabled");
        }

        Self::with_parts(config, model, dataset)
    }

    /// Assemble from already-loaded parts
    pub fn with_parts(
        config: AppConfig,
        model: Result<Box<dyn ChurnClassifier>, ArtifactUnavailable>,
        dataset: Result<ChurnDataset, ArtifactUnavailable>,
    ) -> Self {
        let form = InferenceForm::from_config(&config.form);
        if let Ok(model) = &model {
            info!(model = model.name(), "Prediction form ready");
        }

        Self {
            config,
            model,
            dataset,
            form,
            metrics: SessionMetrics::new(),
        }
    }

    pub fn form(&self) -> &InferenceForm {
        &self.form
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn model(&self) -> Result<&dyn ChurnClassifier, &ArtifactUnavailable> {
        self.model.as_ref().map(|model| &**model)
    }

    pub fn dataset(&self) -> Result<&ChurnDataset, &ArtifactUnavailable> {
        self.dataset.as_ref()
    }

    /// Compute the dashboard charts, or the reason they cannot be shown
    pub fn dashboard(&self) -> Result<Dashboard, &ArtifactUnavailable> {
        self.dataset()
            .map(|dataset| Dashboard::build(dataset, &self.config.dashboard))
    }

    /// Handle one form submission
    pub fn predict(&self, input: &ChurnInput) -> Result<PredictionOutcome, PredictError> {
        let model = match self.model() {
            Ok(model) => model,
            Err(e) => {
                self.metrics.record_failure();
                return Err(PredictError::ModelUnavailable(e.clone()));
            }
        };

        match self.form.submit(model, input) {
            Ok(outcome) => {
                self.metrics.record_prediction(outcome.label, outcome.latency);
                debug!(
                    label = outcome.label.class(),
                    latency_us = outcome.latency.as_micros() as u64,
                    "{}",
                    outcome.message()
                );
                Ok(outcome)
            }
            Err(PredictError::InvalidInput(e)) => {
                self.metrics.record_rejected();
                warn!(error = %e, "Form input rejected");
                Err(PredictError::InvalidInput(e))
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(error = %e, "Prediction failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArtifactKind;
    use crate::form::tests::RecordingClassifier;
    use crate::types::customer::CustomerRecord;
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;

    fn missing_model() -> ArtifactUnavailable {
        ArtifactUnavailable::missing(ArtifactKind::Model, "artifacts/rf_model.onnx")
    }

    #[test]
    fn test_start_without_artifacts_does_not_crash() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.artifacts.model_path = dir.path().join("rf_model.onnx");
        config.artifacts.dataset_path = dir.path().join("telecom_churn.csv");

        let app = App::start(config);

        assert!(matches!(app.model(), Err(ArtifactUnavailable::Missing { .. })));
        assert!(app.dashboard().is_err());

        let err = app.predict(&ChurnInput::default()).unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable(_)));
        assert!(err.to_string().contains("model artifact not found"));
    }

    #[test]
    fn test_dashboard_survives_missing_model() {
        let dataset = ChurnDataset::from_records(vec![
            CustomerRecord::new(0, 100, 1.0, 1, 50.0),
            CustomerRecord::new(1, 90, 0.0, 4, 60.0),
        ]);
        let app = App::with_parts(AppConfig::default(), Err(missing_model()), Ok(dataset));

        let dashboard = app.dashboard().unwrap();
        assert_eq!(dashboard.churn_counts.total(), 2);
        assert!(app.predict(&ChurnInput::default()).is_err());
        assert_eq!(app.metrics().failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_predict_with_classifier() {
        let app = App::with_parts(
            AppConfig::default(),
            Ok(Box::new(RecordingClassifier::returning(1))),
            Err(ArtifactUnavailable::missing(
                ArtifactKind::Dataset,
                PathBuf::from("data/telecom_churn.csv"),
            )),
        );

        let outcome = app.predict(&ChurnInput::default()).unwrap();
        assert_eq!(outcome.message(), "Customer will churn");
        assert_eq!(app.metrics().churn_predictions.load(Ordering::Relaxed), 1);

        let rejected = ChurnInput {
            account_weeks: 1000,
            ..ChurnInput::default()
        };
        assert!(matches!(
            app.predict(&rejected),
            Err(PredictError::InvalidInput(_))
        ));
        assert_eq!(app.metrics().rejected_inputs.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_start_with_unparseable_model_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.artifacts.model_path = dir.path().join("rf_model.onnx");
        config.artifacts.dataset_path = dir.path().join("telecom_churn.csv");
        std::fs::write(&config.artifacts.model_path, b"garbage bytes").unwrap();

        let app = App::start(config);

        assert!(matches!(
            app.model(),
            Err(ArtifactUnavailable::Corrupt { kind: ArtifactKind::Model, .. })
        ));
        let err = app.predict(&ChurnInput::default()).unwrap_err();
        assert!(matches!(err, PredictError::ModelUnavailable(_)));
    }
}
