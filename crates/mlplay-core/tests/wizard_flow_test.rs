//! End-to-end wizard flow against a fixture catalog: select a dataset and a
//! compatible algorithm, keep the defaults, and check the exact payload
//! that would go over the wire.

use serde_json::{json, Map, Value};

use mlplay_core::models::{Algorithm, CreateExperimentRequest, Dataset};
use mlplay_core::response::normalize_list;
use mlplay_core::wizard::WizardState;

fn catalog() -> (Vec<Dataset>, Vec<Algorithm>) {
    let datasets: Vec<Dataset> = normalize_list(json!([
        {
            "id": 1,
            "code": "iris",
            "name": "Iris",
            "task": "multiclass_classification",
            "n_samples": 150,
            "n_features": 4,
            "n_classes": 3,
            "class_labels": ["0", "1", "2"],
            "feature_names": ["f1", "f2", "f3", "f4"],
            "target_name": "class"
        },
        {
            "id": 2,
            "code": "sinx",
            "name": "Sin(x)",
            "task": "regression",
            "n_samples": 500,
            "n_features": 1,
            "target_name": "y"
        }
    ]))
    .unwrap();

    // The algorithms endpoint happens to be paginated in this deployment;
    // the client must not care.
    let algorithms: Vec<Algorithm> = normalize_list(json!({
        "count": 2,
        "results": [
            {
                "id": 1,
                "code": "svm",
                "name": "Support Vector Machine",
                "kind": "classical",
                "description": "SVM classifier/regressor.",
                "hyperparameter_specs": [
                    {
                        "name": "C",
                        "display_name": "C",
                        "type": "float",
                        "default": 1,
                        "description": "Regularization.",
                        "min": 0.0001,
                        "max": 10000,
                        "choices": null,
                        "applicable_tasks": ["binary_classification", "multiclass_classification", "regression"]
                    },
                    {
                        "name": "kernel",
                        "display_name": "Kernel",
                        "type": "choice",
                        "default": "rbf",
                        "choices": ["linear", "rbf"],
                        "applicable_tasks": ["binary_classification", "multiclass_classification", "regression"]
                    }
                ]
            },
            {
                "id": 2,
                "code": "mlp",
                "name": "Multi-layer Perceptron",
                "kind": "deep",
                "description": "Feed-forward network.",
                "hyperparameter_specs": [
                    {
                        "name": "hidden_layers",
                        "type": "int_list",
                        "default": [64, 64],
                        "applicable_tasks": ["multiclass_classification"]
                    },
                    {
                        "name": "learning_rate",
                        "type": "float",
                        "default": 0.001,
                        "applicable_tasks": []
                    }
                ]
            }
        ]
    }))
    .unwrap();

    (datasets, algorithms)
}

#[test]
fn default_submission_payload_matches_the_catalog_defaults() {
    let (datasets, algorithms) = catalog();
    let iris = &datasets[0];
    let svm = &algorithms[0];

    let mut state = WizardState::new();
    state.select_dataset(iris.id);
    state.select_algorithm(svm, Some(iris.task.as_str()));
    assert_eq!(state.validate(), Ok(()));

    let request = state.build_request(iris, svm);
    assert_eq!(request.dataset, 1);
    assert_eq!(request.algorithm, 1);
    assert_eq!(request.test_size, 0.3);
    assert_eq!(request.random_state, 42);
    assert!(request.include_predictions);
    assert!(!request.include_probabilities);

    let mut expected = Map::new();
    expected.insert("C".to_owned(), json!(1));
    expected.insert("kernel".to_owned(), json!("rbf"));
    assert_eq!(request.hyperparameters, expected);
}

#[test]
fn algorithm_choices_follow_the_dataset_task() {
    let (datasets, algorithms) = catalog();

    let for_iris: Vec<_> = algorithms
        .iter()
        .filter(|a| a.declares_task(&datasets[0].task))
        .map(|a| a.code.as_str())
        .collect();
    assert_eq!(for_iris, vec!["svm", "mlp"]);

    // The MLP only tags classification; its task-agnostic learning_rate
    // does not make it selectable for regression.
    let for_sinx: Vec<_> = algorithms
        .iter()
        .filter(|a| a.declares_task(&datasets[1].task))
        .map(|a| a.code.as_str())
        .collect();
    assert_eq!(for_sinx, vec!["svm"]);
}

#[test]
fn switching_datasets_resets_and_rebuilds_hyperparameters() {
    let (datasets, algorithms) = catalog();
    let mlp = &algorithms[1];

    let mut state = WizardState::new();
    state.select_dataset(datasets[0].id);
    state.select_algorithm(mlp, Some(datasets[0].task.as_str()));
    state.set_value("hidden_layers", json!("[128, 128]"));
    state.include_probabilities = true;

    // New dataset, new task: the edit and the flag must not leak through.
    state.select_dataset(datasets[1].id);
    assert_eq!(state.algorithm_id, None);
    assert!(state.values.is_empty());
    assert!(!state.include_probabilities);

    let svm = &algorithms[0];
    state.select_algorithm(svm, Some(datasets[1].task.as_str()));
    let request = state.build_request(&datasets[1], svm);
    assert!(!request.include_probabilities);
    assert_eq!(request.hyperparameters["C"], json!(1));
    assert_eq!(request.hyperparameters["kernel"], json!("rbf"));
    assert!(!request.hyperparameters.contains_key("hidden_layers"));
}

#[test]
fn edited_values_survive_into_the_payload_with_coercion() {
    let (datasets, algorithms) = catalog();
    let iris = &datasets[0];
    let mlp = &algorithms[1];

    let mut state = WizardState::new();
    state.select_dataset(iris.id);
    state.select_algorithm(mlp, Some(iris.task.as_str()));

    state.set_value("hidden_layers", json!("[32, 16]"));
    state.set_value("learning_rate", json!(0.01));
    let request = state.build_request(iris, mlp);
    assert_eq!(request.hyperparameters["hidden_layers"], json!([32, 16]));
    assert_eq!(request.hyperparameters["learning_rate"], json!(0.01));

    // A half-typed literal is shipped verbatim for the backend to judge.
    state.set_value("hidden_layers", json!("[32,"));
    let request = state.build_request(iris, mlp);
    assert_eq!(request.hyperparameters["hidden_layers"], json!("[32,"));
}

#[test]
fn create_request_round_trips_through_json() {
    let (datasets, algorithms) = catalog();
    let mut state = WizardState::new();
    state.select_dataset(datasets[0].id);
    state.select_algorithm(&algorithms[0], Some(datasets[0].task.as_str()));

    let request = state.build_request(&datasets[0], &algorithms[0]);
    let body = serde_json::to_value(&request).unwrap();
    let back: CreateExperimentRequest = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(back, request);
    assert_eq!(body["hyperparameters"], json!({"C": 1, "kernel": "rbf"}));
}

#[test]
fn list_normalization_tolerates_both_shapes() {
    let bare: Vec<Dataset> = normalize_list(json!([{
        "id": 1, "code": "iris", "name": "Iris",
        "task": "multiclass_classification", "n_samples": 150, "n_features": 4
    }]))
    .unwrap();
    assert_eq!(bare.len(), 1);

    let envelope: Vec<Dataset> = normalize_list(json!({"results": [{
        "id": 1, "code": "iris", "name": "Iris",
        "task": "multiclass_classification", "n_samples": 150, "n_features": 4
    }]}))
    .unwrap();
    assert_eq!(envelope.len(), 1);
    assert_eq!(bare, envelope);

    let neither: Vec<Dataset> = normalize_list(Value::Null).unwrap();
    assert!(neither.is_empty());
}
