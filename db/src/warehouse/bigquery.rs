use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AttendanceLogRow, Warehouse};
use crate::{auth::TokenProvider, error::StoreError};

const BIGQUERY_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Streams rows into one BigQuery table through `tabledata.insertAll`.
pub struct BigQueryWarehouse {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
    insert_url: String,
}

#[derive(Serialize)]
struct InsertAllRequest<'a> {
    rows: Vec<InsertRow<'a>>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    json: &'a AttendanceLogRow,
}

#[derive(Deserialize)]
struct InsertAllResponse {
    #[serde(rename = "insertErrors", default)]
    insert_errors: Vec<InsertError>,
}

#[derive(Deserialize)]
struct InsertError {
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Deserialize)]
struct ErrorProto {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: ErrorProto,
}

impl BigQueryWarehouse {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<TokenProvider>,
        project_id: &str,
        dataset: &str,
        table: &str,
    ) -> Self {
        Self {
            http,
            tokens,
            insert_url: format!(
                "{BIGQUERY_BASE_URL}/projects/{project_id}/datasets/{dataset}/tables/{table}/insertAll"
            ),
        }
    }
}

#[async_trait]
impl Warehouse for BigQueryWarehouse {
    async fn stream_attendance(&self, row: AttendanceLogRow) -> Result<(), StoreError> {
        let token = self.tokens.access_token().await?;
        let body = InsertAllRequest {
            rows: vec![InsertRow { json: &row }],
        };

        let response = self
            .http
            .post(&self.insert_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GoogleErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: InsertAllResponse = serde_json::from_str(&text)?;
        check_insert_errors(parsed)?;

        debug!(student = %row.student_id, "Attendance row streamed to warehouse");
        Ok(())
    }
}

/// `insertAll` reports per-row failures inside a 200 response.
fn check_insert_errors(response: InsertAllResponse) -> Result<(), StoreError> {
    if response.insert_errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = response
        .insert_errors
        .into_iter()
        .flat_map(|e| e.errors)
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .collect();

    if messages.is_empty() {
        return Err(StoreError::Backend("BigQuery rejected the row".to_owned()));
    }
    Err(StoreError::Backend(messages.join("; ")))
}
