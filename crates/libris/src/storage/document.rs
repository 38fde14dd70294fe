//! Stored JSON documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A JSON document in a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Store-assigned identifier, unique within its collection.
    pub id: String,
    /// The document body; always a JSON object.
    pub data: Value,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last written.
    pub updated_at: DateTime<Utc>,
}

/// Generate a fresh document id.
#[must_use]
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Borrow `value` as a JSON object, or fail naming `id`.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] for non-object values.
pub fn as_object<'a>(id: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::malformed_document(id, "document body must be a JSON object"))
}

/// Merge `patch` into `target` field by field.
///
/// Top-level keys of `patch` replace those of `target`; a `null` value
/// removes the key instead. Nested objects are replaced, not merged.
pub fn merge_fields(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_document_id_is_unique_hex() {
        let a = new_document_id();
        let b = new_document_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_merge_replaces_and_adds() {
        let mut target = object(json!({"title": "Old", "year": 1999}));
        merge_fields(&mut target, &object(json!({"title": "New", "rating": 7})));
        assert_eq!(
            Value::Object(target),
            json!({"title": "New", "year": 1999, "rating": 7})
        );
    }

    #[test]
    fn test_merge_null_removes_field() {
        let mut target = object(json!({"title": "T", "isbn": "123"}));
        merge_fields(&mut target, &object(json!({"isbn": null, "missing": null})));
        assert_eq!(Value::Object(target), json!({"title": "T"}));
    }

    #[test]
    fn test_merge_replaces_arrays_wholesale() {
        let mut target = object(json!({"authors": ["A", "B"]}));
        merge_fields(&mut target, &object(json!({"authors": ["C"]})));
        assert_eq!(Value::Object(target), json!({"authors": ["C"]}));
    }

    #[test]
    fn test_as_object_rejects_scalars() {
        assert!(as_object("x", &json!({"a": 1})).is_ok());
        let err = as_object("x", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }
}
