//! JSON list codec.
//!
//! Each store persists its whole list as one JSON array. Decoding never fails:
//! local data may be absent, truncated, or written by an older client, and none
//! of that may crash a reader. Entries that do not decode are carried through
//! untouched so that rewriting the list never loses them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::StoreError;

/// A decoded list plus the entries that could not be decoded.
///
/// `layout` has one slot per stored element: `None` where a decoded item sat,
/// the raw value where decoding failed. [`ListDocument::encode`] fills the
/// `None` slots with the current items in order, so unreadable entries keep
/// roughly their position and are never dropped.
#[derive(Debug)]
pub struct ListDocument<T> {
    items: Vec<T>,
    layout: Vec<Option<Value>>,
}

impl<T> Default for ListDocument<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            layout: Vec::new(),
        }
    }
}

impl<T: DeserializeOwned> ListDocument<T> {
    /// Decode a persisted JSON array.
    ///
    /// A document that is not a JSON array decodes as empty.
    pub fn decode(key: &str, raw: &str) -> Self {
        let values = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => values,
            Ok(other) => {
                tracing::warn!(key, kind = json_kind(&other), "stored value is not a list, treating as empty");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored list is not valid JSON, treating as empty");
                return Self::default();
            }
        };

        let mut doc = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            match serde::Deserialize::deserialize(&value) {
                Ok(item) => {
                    doc.items.push(item);
                    doc.layout.push(None);
                }
                Err(e) => {
                    tracing::debug!(key, index, error = %e, "entry does not decode, keeping it as-is");
                    doc.layout.push(Some(value));
                }
            }
        }

        if doc.preserved() > 0 {
            tracing::warn!(key, kept = doc.items.len(), unreadable = doc.preserved(), "list has entries this version cannot read");
        }
        doc
    }
}

impl<T> ListDocument<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of stored entries that did not decode.
    pub fn preserved(&self) -> usize {
        self.layout.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T: Serialize> ListDocument<T> {
    /// Encode the current items, with unreadable entries written back verbatim.
    pub fn encode(&self) -> Result<String, StoreError> {
        let mut items = self.items.iter();
        let mut out = Vec::with_capacity(self.layout.len().max(self.items.len()));
        for slot in &self.layout {
            match slot {
                Some(opaque) => out.push(opaque.clone()),
                None => {
                    if let Some(item) = items.next() {
                        out.push(to_value(item)?);
                    }
                }
            }
        }
        for item in items {
            out.push(to_value(item)?);
        }
        serde_json::to_string(&out).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Decode a persisted JSON array, keeping only the entries that match `T`.
pub fn decode_list<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    ListDocument::decode(key, raw).into_items()
}

/// Encode a list as a JSON array.
pub fn encode_list<T: Serialize>(items: &[T]) -> Result<String, StoreError> {
    serde_json::to_string(items).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Fold a list written without sight of the durable copy back into it.
///
/// Entries are matched on their `"id"` field. A local entry replaces the
/// durable one with the same id where it stands; local entries with new ids
/// are appended. Durable entries the local list never saw are kept.
pub fn merge_lists(key: &str, durable: &str, local: &str) -> Result<String, StoreError> {
    let mut merged = match serde_json::from_str::<Value>(durable) {
        Ok(Value::Array(values)) => values,
        _ => {
            tracing::warn!(key, "durable list unreadable during merge, keeping local entries only");
            Vec::new()
        }
    };
    let local = match serde_json::from_str::<Value>(local) {
        Ok(Value::Array(values)) => values,
        _ => Vec::new(),
    };

    for entry in local {
        let existing = entry_id(&entry)
            .and_then(|id| merged.iter().position(|e| entry_id(e) == Some(id)));
        match existing {
            Some(index) => merged[index] = entry,
            None => merged.push(entry),
        }
    }
    serde_json::to_string(&merged).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn entry_id(value: &Value) -> Option<&str> {
    value.get("id")?.as_str()
}

fn to_value<T: Serialize>(item: &T) -> Result<Value, StoreError> {
    serde_json::to_value(item).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
