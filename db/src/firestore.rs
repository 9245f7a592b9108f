//! # Firestore
//!
//! [`DocumentStore`] over the Firestore REST API (v1).
//!
//! - `add` picks a 20-character document id client-side, the same way the
//!   official SDKs do, and commits a single create-only write. Fields holding
//!   [`FieldValue::ServerTimestamp`] are left out of the document body and sent
//!   as `REQUEST_TIME` field transforms instead.
//! - `count_where_eq` runs a `COUNT` aggregation so no documents are transferred.
//!
//! When `FIRESTORE_EMULATOR_HOST` is set the client talks plain HTTP to the
//! emulator and authenticates as `owner`, which bypasses security rules.

use std::sync::Arc;

use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{
    auth::TokenProvider,
    error::StoreError,
    store::{Document, DocumentStore, FieldValue},
};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const AUTO_ID_LEN: usize = 20;
const COUNT_ALIAS: &str = "count";

pub struct FirestoreStore {
    http: reqwest::Client,
    tokens: Option<Arc<TokenProvider>>,
    base_url: String,
    database_path: String,
}

impl FirestoreStore {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<TokenProvider>,
        project_id: &str,
        database: &str,
    ) -> Self {
        Self {
            http,
            tokens: Some(tokens),
            base_url: FIRESTORE_BASE_URL.to_owned(),
            database_path: format!("projects/{project_id}/databases/{database}"),
        }
    }

    pub fn emulator(http: reqwest::Client, host: &str, project_id: &str, database: &str) -> Self {
        Self {
            http,
            tokens: None,
            base_url: format!("http://{}/v1", host.trim_end_matches('/')),
            database_path: format!("projects/{project_id}/databases/{database}"),
        }
    }

    fn documents_path(&self) -> String {
        format!("{}/documents", self.database_path)
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}:{method}", self.base_url, self.documents_path())
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, StoreError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let token = match &self.tokens {
            Some(tokens) => tokens.access_token().await?,
            None => "owner".to_owned(),
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Deserialize)]
struct CommitResponse {
    #[serde(rename = "writeResults", default)]
    write_results: Vec<Value>,
}

#[derive(Deserialize)]
struct AggregationRow {
    #[serde(default)]
    result: Option<AggregationResult>,
}

#[derive(Deserialize)]
struct AggregationResult {
    #[serde(rename = "aggregateFields", default)]
    aggregate_fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend(&self) -> &'static str {
        "firestore"
    }

    async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let id = auto_id();
        let name = format!("{}/{collection}/{id}", self.documents_path());
        let body = commit_body(&name, &document);

        let response: CommitResponse = self.post(&self.endpoint("commit"), &body).await?;
        if response.write_results.len() != 1 {
            return Err(StoreError::Decode(format!(
                "expected 1 write result, got {}",
                response.write_results.len()
            )));
        }

        debug!(collection, id = %id, "Document created");
        Ok(id)
    }

    async fn count_where_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<u64, StoreError> {
        let body = count_query_body(collection, field, value)?;
        let rows: Vec<AggregationRow> =
            self.post(&self.endpoint("runAggregationQuery"), &body).await?;
        count_from_rows(rows)
    }
}

/// Random `[A-Za-z0-9]{20}` id, matching the SDKs' auto-id format.
pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

/// Encodes a value in Firestore's typed JSON form. Server timestamps have no
/// literal form and return `None`.
fn encode_value(value: &FieldValue) -> Option<Value> {
    let encoded = match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        // int64 travels as a decimal string
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(t) => json!({ "timestampValue": t.to_rfc3339() }),
        FieldValue::Array(items) => {
            let values: Vec<Value> = items.iter().filter_map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        FieldValue::Map(entries) => {
            let fields: Map<String, Value> = entries
                .iter()
                .filter_map(|(k, v)| encode_value(v).map(|v| (k.clone(), v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
        FieldValue::ServerTimestamp => return None,
    };
    Some(encoded)
}

/// Quotes a field name with backticks unless it is a simple identifier.
fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        name.to_owned()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn commit_body(name: &str, document: &Document) -> Value {
    let mut fields = Map::new();
    let mut transforms = Vec::new();

    for (key, value) in document {
        match encode_value(value) {
            Some(encoded) => {
                fields.insert(key.clone(), encoded);
            }
            None => transforms.push(json!({
                "fieldPath": field_path(key),
                "setToServerValue": "REQUEST_TIME",
            })),
        }
    }

    json!({
        "writes": [{
            "update": { "name": name, "fields": fields },
            "updateTransforms": transforms,
            "currentDocument": { "exists": false },
        }]
    })
}

fn count_query_body(collection: &str, field: &str, value: &FieldValue) -> Result<Value, StoreError> {
    let value = encode_value(value).ok_or_else(|| {
        StoreError::Backend("cannot filter on a server timestamp".to_owned())
    })?;

    Ok(json!({
        "structuredAggregationQuery": {
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field_path(field) },
                        "op": "EQUAL",
                        "value": value,
                    }
                }
            },
            "aggregations": [{ "alias": COUNT_ALIAS, "count": {} }]
        }
    }))
}

fn count_from_rows(rows: Vec<AggregationRow>) -> Result<u64, StoreError> {
    let Some(result) = rows.into_iter().find_map(|row| row.result) else {
        return Ok(0);
    };

    let count = result
        .aggregate_fields
        .get(COUNT_ALIAS)
        .and_then(|v| v.get("integerValue"))
        .ok_or_else(|| StoreError::Decode("aggregation result has no count".to_owned()))?;

    match count {
        Value::String(s) => s
            .parse()
            .map_err(|e| StoreError::Decode(format!("invalid count '{s}': {e}"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| StoreError::Decode(format!("invalid count {n}"))),
        other => Err(StoreError::Decode(format!("invalid count {other}"))),
    }
}

/// Extracts the human-readable message from a Google API error body, which
/// is either an object or (for streaming query methods) an array of objects.
fn api_error(status: u16, body: &str) -> StoreError {
    let message = serde_json::from_str::<GoogleErrorEnvelope>(body)
        .map(|e| e.error.message)
        .or_else(|_| {
            serde_json::from_str::<Vec<GoogleErrorEnvelope>>(body).map(|v| {
                v.into_iter()
                    .next()
                    .map(|e| e.error.message)
                    .unwrap_or_default()
            })
        })
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Firestore request failed with status {status}")
            } else {
                body.trim().to_owned()
            }
        });

    StoreError::Api { status, message }
}
