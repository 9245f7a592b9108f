//! # Document store
//!
//! Schemaless, collection-oriented storage. Records are flat maps of named
//! [`FieldValue`]s; the store assigns each new document an opaque string id.
//!
//! Only the two operations the service needs are part of the contract:
//! append a document, and count documents whose field equals a value.

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// A single field value inside a [`Document`].
///
/// Serializes as the plain JSON it was decoded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// Resolved by the store to its own clock at write time.
    ServerTimestamp,
}

impl FieldValue {
    /// Null, `false`, zero, NaN and the empty string.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Integer(i) => *i == 0,
            FieldValue::Double(d) => *d == 0.0 || d.is_nan(),
            FieldValue::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Caller-supplied JSON, kept as whatever type it arrived as. Numbers that
/// fit an `i64` stay integers.
impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Text form used in messages. Null renders empty.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null | FieldValue::ServerTimestamp => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Double(d) => write!(f, "{d}"),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Timestamp(t) => f.write_str(&t.to_rfc3339()),
            FieldValue::Array(_) | FieldValue::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Field name to value. Ordered so writes are deterministic.
pub type Document = BTreeMap<String, FieldValue>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name used in logs (`firestore`, `memory`).
    fn backend(&self) -> &'static str;

    /// Inserts `document` into `collection` and returns the new document id.
    async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Number of documents in `collection` whose `field` equals `value`.
    async fn count_where_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<u64, StoreError>;

    /// Releases any resources held by the client. Calls after shutdown may fail.
    async fn shutdown(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
