//! Wire model for the playground backend API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared type of a hyperparameter, as published by the backend.
///
/// The set is closed on the client side: any declared type the client does
/// not recognize decodes as [`ParamType::Text`] and is edited as an opaque
/// string, so a newer backend never breaks the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Bool,
    Choice,
    IntList,
    NumberOrString,
    Int,
    Float,
    /// Backend `string`, or anything unrecognized.
    #[serde(rename = "string", other)]
    Text,
}

/// Backend-declared description of one configurable algorithm parameter.
///
/// Immutable on the client; sourced per algorithm from `/api/algorithms/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSpec {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub ty: ParamType,
    #[serde(default)]
    pub default: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    /// Tasks this parameter is meaningful for. Empty means every task.
    #[serde(default)]
    pub applicable_tasks: Vec<String>,
}

impl HyperparameterSpec {
    /// Applicability rule used for defaults and payload building: an empty
    /// `applicable_tasks` list applies to every task.
    pub fn applies_to(&self, task: &str) -> bool {
        self.applicable_tasks.is_empty() || self.applicable_tasks.iter().any(|t| t == task)
    }

    /// Label shown next to the generated input.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Classical,
    Deep,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlgorithmKind::Classical => write!(f, "classical"),
            AlgorithmKind::Deep => write!(f, "deep"),
            AlgorithmKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub kind: AlgorithmKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hyperparameter_specs: Vec<HyperparameterSpec>,
}

impl Algorithm {
    /// Selection filter: an algorithm is offered for a task only when at
    /// least one of its specs lists that task explicitly.
    ///
    /// Intentionally stricter than [`HyperparameterSpec::applies_to`], where
    /// an empty task list counts as universal: an algorithm whose specs are
    /// all task-agnostic is never offered. The catalog the backend ships
    /// always tags at least one spec per supported task, so the two rules
    /// are kept as-is instead of being unified.
    pub fn declares_task(&self, task: &str) -> bool {
        self.hyperparameter_specs
            .iter()
            .any(|s| s.applicable_tasks.iter().any(|t| t == task))
    }

    /// Deduplicated union of tasks across all specs, in first-seen order.
    pub fn supported_tasks(&self) -> Vec<&str> {
        let mut tasks = Vec::new();
        for spec in &self.hyperparameter_specs {
            for task in &spec.applicable_tasks {
                if !tasks.contains(&task.as_str()) {
                    tasks.push(task.as_str());
                }
            }
        }
        tasks
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// The pivot for the whole wizard: determines which algorithms are
    /// selectable and which hyperparameter specs apply.
    pub task: String,
    pub n_samples: i64,
    pub n_features: i64,
    #[serde(default)]
    pub n_classes: Option<i64>,
    #[serde(default)]
    pub class_labels: Option<Vec<String>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub target_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    Pending,
    Running,
    Finished,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperimentStatus::Pending => write!(f, "pending"),
            ExperimentStatus::Running => write!(f, "running"),
            ExperimentStatus::Finished => write!(f, "finished"),
            ExperimentStatus::Failed => write!(f, "failed"),
            ExperimentStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A recorded experiment, read-only from the client's perspective.
///
/// The list endpoint serializes a compact subset (no configuration, no
/// predictions); the detail endpoint fills everything in. One struct covers
/// both shapes, with the detail-only fields optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: i64,
    pub dataset: Dataset,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub status: ExperimentStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub metrics: Option<Map<String, Value>>,
    #[serde(default)]
    pub hyperparameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub test_size: Option<f64>,
    #[serde(default)]
    pub random_state: Option<i64>,
    #[serde(default)]
    pub include_predictions: Option<bool>,
    #[serde(default)]
    pub include_probabilities: Option<bool>,
    #[serde(default)]
    pub predictions: Option<Value>,
}

impl Experiment {
    /// Headline metric for cards and the detail summary: accuracy for
    /// classification tasks, R² for regression, nothing otherwise.
    pub fn primary_metric(&self) -> Option<(&'static str, f64)> {
        let metrics = self.metrics.as_ref()?;
        if is_classification_task(&self.task) {
            Some(("accuracy", metrics.get("accuracy")?.as_f64()?))
        } else if self.task.contains("regression") {
            Some(("r2", metrics.get("r2")?.as_f64()?))
        } else {
            None
        }
    }
}

/// POST body for `/api/experiments/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExperimentRequest {
    pub dataset: i64,
    pub algorithm: i64,
    pub hyperparameters: Map<String, Value>,
    pub test_size: f64,
    pub random_state: i64,
    pub include_predictions: bool,
    pub include_probabilities: bool,
}

/// Task codes are classification-like when they end with the
/// `_classification` suffix (e.g. `binary_classification`).
pub fn is_classification_task(task: &str) -> bool {
    task.ends_with("_classification")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_type_decodes_snake_case_and_falls_back() {
        let ty: ParamType = serde_json::from_value(json!("int_list")).unwrap();
        assert_eq!(ty, ParamType::IntList);
        let ty: ParamType = serde_json::from_value(json!("number_or_string")).unwrap();
        assert_eq!(ty, ParamType::NumberOrString);
        let ty: ParamType = serde_json::from_value(json!("string")).unwrap();
        assert_eq!(ty, ParamType::Text);
        let ty: ParamType = serde_json::from_value(json!("something_new")).unwrap();
        assert_eq!(ty, ParamType::Text);
    }

    #[test]
    fn spec_tolerates_nulls_and_unknown_fields() {
        let spec: HyperparameterSpec = serde_json::from_value(json!({
            "name": "C",
            "display_name": "C",
            "type": "float",
            "default": 1,
            "description": "Regularization.",
            "min": 0.0001,
            "max": 10000,
            "choices": null,
            "applicable_tasks": ["binary_classification"],
            "advanced": false
        }))
        .unwrap();
        assert_eq!(spec.ty, ParamType::Float);
        assert!(spec.choices.is_none());
        assert!(spec.applies_to("binary_classification"));
        assert!(!spec.applies_to("regression"));
    }

    #[test]
    fn declares_task_ignores_task_agnostic_specs() {
        let algorithm: Algorithm = serde_json::from_value(json!({
            "id": 7,
            "code": "mlp",
            "name": "MLP",
            "kind": "deep",
            "hyperparameter_specs": [
                {"name": "lr", "type": "float", "default": 0.001, "applicable_tasks": []},
                {"name": "hidden", "type": "int_list", "default": [64, 64],
                 "applicable_tasks": ["multiclass_classification"]}
            ]
        }))
        .unwrap();
        assert!(algorithm.declares_task("multiclass_classification"));
        // `lr` applies to regression (empty list), but selection needs an
        // explicit mention.
        assert!(!algorithm.declares_task("regression"));
        assert_eq!(algorithm.supported_tasks(), vec!["multiclass_classification"]);
    }

    #[test]
    fn experiment_decodes_compact_list_shape() {
        let experiment: Experiment = serde_json::from_value(json!({
            "id": 5,
            "dataset": {"id": 1, "code": "iris", "name": "Iris",
                        "task": "multiclass_classification",
                        "n_samples": 150, "n_features": 4},
            "algorithm": {"id": 1, "code": "svm", "name": "SVM", "kind": "classical"},
            "task": "multiclass_classification",
            "status": "finished",
            "created_at": "2024-05-01T12:00:00Z",
            "metrics": {"accuracy": 0.93}
        }))
        .unwrap();
        assert_eq!(experiment.status, ExperimentStatus::Finished);
        assert_eq!(experiment.primary_metric(), Some(("accuracy", 0.93)));
        assert!(experiment.test_size.is_none());
        assert!(experiment.predictions.is_none());
    }

    #[test]
    fn experiment_decodes_detail_shape_with_regression_metric() {
        let experiment: Experiment = serde_json::from_value(json!({
            "id": 6,
            "dataset": {"id": 2, "code": "sinx", "name": "Sin(x)",
                        "task": "regression",
                        "n_samples": 500, "n_features": 1,
                        "target_name": "y"},
            "algorithm": {"id": 2, "code": "rf", "name": "Random Forest", "kind": "classical"},
            "task": "regression",
            "status": "finished",
            "created_at": "2024-05-02T08:30:00Z",
            "hyperparameters": {"n_estimators": 100},
            "test_size": 0.2,
            "random_state": 42,
            "include_predictions": true,
            "include_probabilities": false,
            "metrics": {"r2": 0.87},
            "predictions": [0.1, 0.2]
        }))
        .unwrap();
        assert_eq!(experiment.primary_metric(), Some(("r2", 0.87)));
        assert_eq!(experiment.test_size, Some(0.2));
        assert!(experiment.predictions.is_some());
    }

    #[test]
    fn unknown_status_does_not_fail_the_decode() {
        let status: ExperimentStatus = serde_json::from_value(json!("queued")).unwrap();
        assert_eq!(status, ExperimentStatus::Unknown);
    }

    #[test]
    fn create_request_serializes_the_wire_field_names() {
        let request = CreateExperimentRequest {
            dataset: 1,
            algorithm: 2,
            hyperparameters: Map::new(),
            test_size: 0.3,
            random_state: 42,
            include_predictions: true,
            include_probabilities: false,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["dataset"], json!(1));
        assert_eq!(body["algorithm"], json!(2));
        assert_eq!(body["test_size"], json!(0.3));
        assert_eq!(body["random_state"], json!(42));
        assert_eq!(body["include_predictions"], json!(true));
        assert_eq!(body["include_probabilities"], json!(false));
    }
}
