//! Response-shape tolerance for the backend API.
//!
//! List endpoints may answer with a bare JSON array or a paginated
//! `{"results": [...]}` envelope, depending on backend pagination settings;
//! both normalize to a plain vector.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract and decode the item array from either list shape. A body that is
/// neither an array nor an envelope yields an empty list, not an error.
pub fn normalize_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, serde_json::Error> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items.into_iter().map(serde_json::from_value).collect()
}

/// User-facing message carried by DRF-style error bodies.
pub fn detail_message(body: &Value) -> Option<String> {
    Some(body.get("detail")?.as_str()?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Item {
        id: i64,
    }

    #[test]
    fn accepts_bare_arrays_and_paginated_envelopes() {
        let bare: Vec<Item> = normalize_list(json!([{"id": 1}])).unwrap();
        assert_eq!(bare, vec![Item { id: 1 }]);

        let paginated: Vec<Item> =
            normalize_list(json!({"count": 1, "results": [{"id": 1}]})).unwrap();
        assert_eq!(paginated, vec![Item { id: 1 }]);
    }

    #[test]
    fn unrecognized_shapes_default_to_empty() {
        let from_null: Vec<Item> = normalize_list(Value::Null).unwrap();
        assert!(from_null.is_empty());

        let from_object: Vec<Item> = normalize_list(json!({"detail": "nope"})).unwrap();
        assert!(from_object.is_empty());

        let results_not_a_list: Vec<Item> = normalize_list(json!({"results": 3})).unwrap();
        assert!(results_not_a_list.is_empty());
    }

    #[test]
    fn item_decode_errors_are_surfaced() {
        let result: Result<Vec<Item>, _> = normalize_list(json!([{"id": "not-a-number"}]));
        assert!(result.is_err());
    }

    #[test]
    fn detail_extraction() {
        assert_eq!(
            detail_message(&json!({"detail": "No credits left."})),
            Some("No credits left.".to_owned())
        );
        assert_eq!(detail_message(&json!({"detail": 5})), None);
        assert_eq!(detail_message(&json!({})), None);
        assert_eq!(detail_message(&Value::Null), None);
    }
}
