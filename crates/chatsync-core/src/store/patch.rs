//! Merge-write patch model.
//!
//! The store has no native partial-update support, so merge semantics are
//! explicit: a `WritePatch` names the fields a writer owns, and
//! `apply_patch` folds it into the existing document with field-level
//! precedence. Fields absent from the patch are never touched -- that is
//! what lets the provisioner and the summarizer race safely on the same
//! thread document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use std::collections::BTreeMap;

/// One field's pending write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Write this concrete JSON value (JSON null is a legitimate value:
    /// the summarizer writes `lastSenderId: null` for anonymous messages).
    Value(Value),
    /// Resolve to the store's clock at the moment the write is applied.
    ServerTimestamp,
    /// Set-union these elements onto the existing array. Existing elements
    /// keep their order; new elements append in patch order; duplicates
    /// (full JSON equality) collapse to one occurrence.
    ArrayUnion(Vec<Value>),
}

/// An ordered set of top-level field writes for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WritePatch {
    fields: BTreeMap<String, FieldValue>,
}

impl WritePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a concrete value for `field`.
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), FieldValue::Value(value));
        self
    }

    /// Stamp `field` with the store clock at write time.
    pub fn server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldValue::ServerTimestamp);
        self
    }

    /// Union `values` onto the array at `field`.
    pub fn array_union(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.fields.insert(field.into(), FieldValue::ArrayUnion(values));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Serialize a timestamp the way all store-written timestamps are stored.
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Fold a patch into the existing document.
///
/// Pure function: implementations call it inside whatever read-modify-write
/// unit keeps the fold atomic. A missing document starts from `{}`. A
/// non-object document is replaced wholesale; that only happens when
/// something outside this system corrupted the record, and wedging every
/// future merge on it would be worse than repairing it.
pub fn apply_patch(existing: Option<&Value>, patch: &WritePatch, now: DateTime<Utc>) -> Value {
    let mut doc = match existing {
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            warn!("merge target is not a JSON object, replacing it");
            Map::new()
        }
        None => Map::new(),
    };

    for (field, write) in patch.fields() {
        match write {
            FieldValue::Value(value) => {
                doc.insert(field.to_string(), value.clone());
            }
            FieldValue::ServerTimestamp => {
                doc.insert(field.to_string(), timestamp_value(now));
            }
            FieldValue::ArrayUnion(values) => {
                let mut array = match doc.remove(field) {
                    Some(Value::Array(items)) => items,
                    // Absent or non-array: union starts from empty.
                    _ => Vec::new(),
                };
                for value in values {
                    if !array.contains(value) {
                        array.push(value.clone());
                    }
                }
                doc.insert(field.to_string(), Value::Array(array));
            }
        }
    }

    Value::Object(doc)
}
