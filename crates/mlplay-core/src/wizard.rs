//! Experiment configuration wizard state.
//!
//! Cascading selection: dataset → algorithm → hyperparameters → run options.
//! Every cascade is an explicit method on [`WizardState`], invoked from the
//! selection handler itself rather than from a reactive watcher, so the
//! reset/derive order is deterministic and testable without a UI runtime.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{
    is_classification_task, Algorithm, CreateExperimentRequest, Dataset, HyperparameterSpec,
};
use crate::schema::{applicable_specs, build_payload};

/// Local, pre-network validation failures. Hyperparameter shape is
/// deliberately not checked here; that call belongs to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a dataset first.")]
    MissingDataset,

    #[error("Select an algorithm first.")]
    MissingAlgorithm,

    #[error("Test size must be strictly between 0 and 1.")]
    TestSizeOutOfRange,

    #[error("An experiment is already being submitted.")]
    SubmissionInFlight,
}

/// Ephemeral state backing the experiment creator. Lives for one visit of
/// the wizard page and is dropped on navigation or successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub dataset_id: Option<i64>,
    pub algorithm_id: Option<i64>,
    pub values: Map<String, Value>,
    pub test_size: f64,
    pub random_state: i64,
    pub include_predictions: bool,
    pub include_probabilities: bool,
    pub submitting: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            dataset_id: None,
            algorithm_id: None,
            values: Map::new(),
            test_size: 0.3,
            random_state: 42,
            include_predictions: true,
            include_probabilities: false,
            submitting: false,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a dataset. The task may have changed, so everything derived
    /// from it — algorithm choice, hyperparameter values, the probabilities
    /// flag — is cleared.
    pub fn select_dataset(&mut self, id: i64) {
        self.clear_dataset();
        self.dataset_id = Some(id);
    }

    /// Return to the no-dataset state. Run options are kept; they are not
    /// derived from the dataset.
    pub fn clear_dataset(&mut self) {
        self.dataset_id = None;
        self.algorithm_id = None;
        self.values = Map::new();
        self.include_probabilities = false;
    }

    /// Select an algorithm and derive default hyperparameter values for the
    /// current task. Must be called again whenever the task changes, even
    /// under an unchanged algorithm id: applicability differs per task.
    pub fn select_algorithm(&mut self, algorithm: &Algorithm, task: Option<&str>) {
        self.algorithm_id = Some(algorithm.id);
        self.values = default_values(&algorithm.hyperparameter_specs, task);
    }

    /// Record one hyperparameter edit. Raw, unparsable values are stored
    /// as-is; coercion happens when the payload is built.
    pub fn set_value(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    /// Structural checks gating submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.submitting {
            return Err(ValidationError::SubmissionInFlight);
        }
        if self.dataset_id.is_none() {
            return Err(ValidationError::MissingDataset);
        }
        if self.algorithm_id.is_none() {
            return Err(ValidationError::MissingAlgorithm);
        }
        if !self.test_size.is_finite() || self.test_size <= 0.0 || self.test_size >= 1.0 {
            return Err(ValidationError::TestSizeOutOfRange);
        }
        Ok(())
    }

    /// Compose the creation payload from the current selections.
    ///
    /// Probability output only makes sense for classification tasks; for
    /// anything else the flag is forced off no matter what the toggle said.
    pub fn build_request(
        &self,
        dataset: &Dataset,
        algorithm: &Algorithm,
    ) -> CreateExperimentRequest {
        let task = dataset.task.as_str();
        CreateExperimentRequest {
            dataset: dataset.id,
            algorithm: algorithm.id,
            hyperparameters: build_payload(
                &algorithm.hyperparameter_specs,
                Some(task),
                &self.values,
            ),
            test_size: self.test_size,
            random_state: self.random_state,
            include_predictions: self.include_predictions,
            include_probabilities: self.include_probabilities && is_classification_task(task),
        }
    }
}

/// Default value map for all specs applicable to `task`.
pub fn default_values(specs: &[HyperparameterSpec], task: Option<&str>) -> Map<String, Value> {
    applicable_specs(specs, task)
        .into_iter()
        .map(|s| (s.name.clone(), s.default.clone()))
        .collect()
}
