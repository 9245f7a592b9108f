//! Process-local [`DocumentStore`].
//!
//! Backs `STORE_BACKEND=memory` for running without cloud credentials, and the
//! test suites. Server timestamps resolve to `Utc::now()` at insert time.
//! A failure can be injected so every subsequent call returns it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::StoreError,
    firestore::auto_id,
    store::{Document, DocumentStore, FieldValue},
};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(String, Document)>>>,
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            collections: RwLock::default(),
            failure: RwLock::new(Some(message.into())),
        }
    }

    /// Makes subsequent calls fail with `message`, or succeed again with `None`.
    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.write().await = message;
    }

    /// Snapshot of a collection in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<(String, Document)> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .await
            .get(collection)?
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, doc)| doc.clone())
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn add(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        self.check_failure().await?;

        let now = Utc::now();
        for value in document.values_mut() {
            if *value == FieldValue::ServerTimestamp {
                *value = FieldValue::Timestamp(now);
            }
        }

        let id = auto_id();
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .push((id.clone(), document));

        Ok(id)
    }

    async fn count_where_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> Result<u64, StoreError> {
        self.check_failure().await?;

        let count = self
            .collections
            .read()
            .await
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .count()
            })
            .unwrap_or(0);

        Ok(count as u64)
    }
}
