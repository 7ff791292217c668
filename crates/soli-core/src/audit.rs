//! Field-level diffing for the audit trail.
//!
//! Update entries store only the fields that actually changed, as two sparse
//! objects (`before` / `after`). Equality is decided on the compact JSON
//! serialization of each field value, which is canonical here because object
//! keys serialize in sorted order.

use serde_json::{Map, Value};

/// Sparse before/after field maps produced by [`changed_fields`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangedFields {
    pub before: Map<String, Value>,
    pub after: Map<String, Value>,
}

impl ChangedFields {
    /// True when no field differs between the two sides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Converts the maps into the `Option<Value>` shape stored on a change
    /// row. Returns `(None, None)` when nothing changed.
    #[must_use]
    pub fn into_values(self) -> (Option<Value>, Option<Value>) {
        if self.is_empty() {
            (None, None)
        } else {
            (
                Some(Value::Object(self.before)),
                Some(Value::Object(self.after)),
            )
        }
    }
}

/// Compares two serialized entities field by field.
///
/// Iterates the union of both key sets. A field counts as changed when the
/// compact JSON text of the two values differs; a missing key compares equal
/// to an explicit `null`. Changed fields are copied into the sparse maps,
/// each side only if the key exists there. Non-object inputs are treated as
/// empty objects.
#[must_use]
pub fn changed_fields(before: &Value, after: &Value) -> ChangedFields {
    let empty = Map::new();
    let before_map = before.as_object().unwrap_or(&empty);
    let after_map = after.as_object().unwrap_or(&empty);

    let mut keys: Vec<&String> = before_map.keys().collect();
    for key in after_map.keys() {
        if !before_map.contains_key(key) {
            keys.push(key);
        }
    }

    let mut out = ChangedFields::default();
    for key in keys {
        let b = before_map.get(key).unwrap_or(&Value::Null);
        let a = after_map.get(key).unwrap_or(&Value::Null);
        if b.to_string() == a.to_string() {
            continue;
        }
        if let Some(v) = before_map.get(key) {
            out.before.insert(key.clone(), v.clone());
        }
        if let Some(v) = after_map.get(key) {
            out.after.insert(key.clone(), v.clone());
        }
    }
    out
}

/// Removes top-level `null` fields from a JSON object.
///
/// Falsy-but-present values (`0`, `""`, `false`) are kept. Non-object values
/// are returned unchanged.
#[must_use]
pub fn strip_null_fields(value: &Value) -> Value {
    match value.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        None => value.clone(),
    }
}
