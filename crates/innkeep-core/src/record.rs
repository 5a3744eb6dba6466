//! # Record Model
//!
//! A `Record` is one semi-structured entry in a collection: a JSON object
//! mapping field names to strings, numbers, booleans, nested objects or arrays.
//!
//! ## Reserved Fields
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  field        set by        changes                                    │
//! │  ───────────  ────────────  ─────────────────────────────────────────  │
//! │  id           caller/store  never (unique within the collection)       │
//! │  created_at   store         never (RFC 3339, set at insert)            │
//! │  updated_at   store         on every update                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Ordering
//! Query ordering needs a total order over JSON values. Within a type the
//! natural order applies; across types the rank below decides:
//!
//! ```text
//! missing < null < bool < number < string < array < object
//! ```
//!
//! Two arrays (or two objects) always tie, so they keep their insertion order
//! under a stable sort.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ValidationError;

/// Field holding the record identifier.
pub const ID_FIELD: &str = "id";

/// Field holding the insert timestamp.
pub const CREATED_AT_FIELD: &str = "created_at";

/// Field holding the last-update timestamp.
pub const UPDATED_AT_FIELD: &str = "updated_at";

// =============================================================================
// Record
// =============================================================================

/// A single document stored in a collection.
///
/// Serializes as a bare JSON object, so a collection persists as a JSON array
/// of objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Record(Map::new())
    }

    /// Builds a record from an arbitrary JSON value.
    ///
    /// ## Returns
    /// * `Ok(Record)` - The value was an object
    /// * `Err(ValidationError::NotAnObject)` - Anything else
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Record(map)),
            _ => Err(ValidationError::NotAnObject {
                what: "record".to_string(),
            }),
        }
    }

    /// Returns the record id when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.get_str(ID_FIELD)
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a field as a string slice, if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns a field as `f64`, if it is a number.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Returns true if the field is present (even when it holds `null`).
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record, returning the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Checks every filter against the record (logical AND).
    ///
    /// A filter on a field the record does not have never matches.
    pub fn matches(&self, filters: &Map<String, Value>) -> bool {
        filters.iter().all(|(field, expected)| {
            self.0
                .get(field)
                .map(|actual| values_equal(actual, expected))
                .unwrap_or(false)
        })
    }

    /// Shallow-merges a patch over the record.
    ///
    /// Patch fields overwrite; fields the patch does not mention are kept
    /// exactly as they were. Nested objects are replaced, not merged.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (field, value) in patch {
            self.0.insert(field, value);
        }
    }

    /// Deserializes the record into a typed document.
    pub fn to_typed<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

// =============================================================================
// Value Semantics
// =============================================================================

/// Exact-match equality used by query filters.
///
/// Identical to `==` except that numbers compare by value, so a filter of
/// `2` matches a stored `2.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        _ => a == b,
    }
}

/// Orders two (possibly missing) field values for `order_by`.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
