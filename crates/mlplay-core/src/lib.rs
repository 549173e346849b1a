//! mlplay-core: domain logic for the ML playground web client.
//!
//! Everything data-dependent lives here — the hyperparameter schema
//! interpreter, the experiment wizard state machine, and the wire model —
//! so it can be unit tested natively. The Leptos frontend crate is a thin
//! presentation shell over these types.

pub mod error;
pub mod models;
pub mod response;
pub mod schema;
pub mod wizard;

pub use error::ApiError;
pub use models::{
    is_classification_task, Algorithm, AlgorithmKind, CreateExperimentRequest, Dataset,
    Experiment, ExperimentStatus, HyperparameterSpec, ParamType,
};
pub use schema::{applicable_specs, build_payload, IntListInput};
pub use wizard::{ValidationError, WizardState};
