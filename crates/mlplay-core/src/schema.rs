//! Hyperparameter schema interpreter.
//!
//! The backend describes each algorithm's parameters as a list of
//! [`HyperparameterSpec`]s. This module filters them by task, resolves the
//! value a form field should show, and coerces user input into the
//! `hyperparameters` object submitted on experiment creation.
//!
//! Coercion is deliberately permissive: text that fails to parse is passed
//! through verbatim and the backend stays the final authority. The client
//! never rejects a hyperparameter value, only structural things like a
//! missing dataset selection (see [`crate::wizard`]).

use serde_json::{Map, Number, Value};

use crate::models::{HyperparameterSpec, ParamType};

/// Filter `specs` down to those applicable to `task`, preserving order.
///
/// A missing or empty task applies no filter. A spec with an empty
/// `applicable_tasks` list applies to every task.
pub fn applicable_specs<'a>(
    specs: &'a [HyperparameterSpec],
    task: Option<&str>,
) -> Vec<&'a HyperparameterSpec> {
    match task.filter(|t| !t.is_empty()) {
        Some(task) => specs.iter().filter(|s| s.applies_to(task)).collect(),
        None => specs.iter().collect(),
    }
}

/// Value a field currently holds: the user's edit if present, else the
/// spec's declared default.
pub fn current_value(spec: &HyperparameterSpec, values: &Map<String, Value>) -> Value {
    values
        .get(&spec.name)
        .cloned()
        .unwrap_or_else(|| spec.default.clone())
}

/// Result of interpreting an `int_list` text edit.
///
/// `Raw` keeps the user's text untouched, so intermediate invalid states
/// survive both editing and submission; the backend rejects them if they are
/// still invalid at that point.
#[derive(Debug, Clone, PartialEq)]
pub enum IntListInput {
    Parsed(Vec<i64>),
    Raw(String),
}

impl IntListInput {
    /// Parse a JSON-array literal of integers; anything else stays raw.
    pub fn parse(text: &str) -> Self {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
            if let Some(ints) = items.iter().map(as_integer).collect::<Option<Vec<_>>>() {
                return IntListInput::Parsed(ints);
            }
        }
        IntListInput::Raw(text.to_owned())
    }

    /// The value stored in the wizard state for this edit.
    pub fn into_value(self) -> Value {
        match self {
            IntListInput::Parsed(ints) => {
                Value::Array(ints.into_iter().map(Value::from).collect())
            }
            IntListInput::Raw(text) => Value::String(text),
        }
    }
}

/// Integer in the loose JSON sense: `2` and `2.0` qualify, `2.5` does not.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Some(f as i64)
        }
        _ => None,
    }
}

/// Edit-time coercion for `int` / `float` number inputs: empty or
/// unparsable input becomes null, `int` truncates toward zero.
pub fn coerce_numeric(text: &str, ty: ParamType) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    let Ok(number) = trimmed.parse::<f64>() else {
        return Value::Null;
    };
    if !number.is_finite() {
        return Value::Null;
    }
    match ty {
        ParamType::Int => Value::from(number.trunc() as i64),
        _ => Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null),
    }
}

/// Strict boolean for checkbox display, regardless of what the backend or a
/// previous edit put in the value map.
pub fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text shown in the `int_list` editor: arrays render as their JSON
/// literal, raw strings as-is, an unset value as an empty list literal.
pub fn int_list_text(value: &Value) -> String {
    match value {
        Value::Array(_) => value.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => "[]".to_owned(),
        other => other.to_string(),
    }
}

/// Text shown in free-form editors (`number_or_string`, numeric, fallback).
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build the `hyperparameters` object for experiment creation.
///
/// Only task-applicable specs contribute; untouched fields fall back to the
/// spec default. `int_list` strings are promoted to integer arrays when they
/// parse, `number_or_string` strings are promoted to numbers when numeric.
/// Everything else, including malformed text, passes through unchanged.
pub fn build_payload(
    specs: &[HyperparameterSpec],
    task: Option<&str>,
    values: &Map<String, Value>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for spec in applicable_specs(specs, task) {
        if spec.name.is_empty() {
            continue;
        }
        let value = current_value(spec, values);
        let coerced = match spec.ty {
            ParamType::IntList => coerce_int_list(&spec.name, value),
            ParamType::NumberOrString => coerce_number_or_string(value),
            ParamType::Bool
            | ParamType::Choice
            | ParamType::Int
            | ParamType::Float
            | ParamType::Text => value,
        };
        out.insert(spec.name.clone(), coerced);
    }
    out
}

fn coerce_int_list(name: &str, value: Value) -> Value {
    match value {
        Value::String(text) => match IntListInput::parse(&text) {
            IntListInput::Parsed(ints) => {
                Value::Array(ints.into_iter().map(Value::from).collect())
            }
            IntListInput::Raw(raw) => {
                log::debug!("hyperparameter {name}: unparsed int_list text passed through");
                Value::String(raw)
            }
        },
        other => other,
    }
}

fn coerce_number_or_string(value: Value) -> Value {
    match value {
        Value::String(s) => match number_from_str(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        other => other,
    }
}

/// A string counts as numeric when it is non-empty after trimming and
/// parses as a finite number. Integral results are emitted as JSON
/// integers, matching what the form would have produced directly.
fn number_from_str(s: &str) -> Option<Number> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    let f = trimmed.parse::<f64>().ok()?;
    if f.is_finite() {
        Number::from_f64(f)
    } else {
        None
    }
}
