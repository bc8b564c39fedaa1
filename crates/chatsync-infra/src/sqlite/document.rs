//! SQLite document store implementation.
//!
//! Implements `DocumentStore` from `chatsync-core`: JSON documents stored
//! as text rows keyed by path. Reads go to the reader pool; merges run as
//! a read-modify-write transaction on the single-connection writer pool,
//! so concurrent merges on the same path serialize instead of clobbering
//! each other.

use chatsync_core::store::document_store::DocumentStore;
use chatsync_core::store::patch::{WritePatch, apply_patch};
use chatsync_types::error::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DocumentStore`.
pub struct SqliteDocumentStore {
    pool: DatabasePool,
}

impl SqliteDocumentStore {
    /// Create a new document store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_document(path: &str, data: &str) -> Result<Value, StoreError> {
    serde_json::from_str(data).map_err(|e| StoreError::InvalidDocument {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

const UPSERT: &str = r#"INSERT INTO documents (path, data, created_at, updated_at)
   VALUES (?, ?, ?, ?)
   ON CONFLICT (path) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at"#;

impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT data FROM documents WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let data: String = row
                    .try_get("data")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(parse_document(path, &data)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, path: &str, document: &Value) -> Result<(), StoreError> {
        let now = format_datetime(&Utc::now());
        let data = serde_json::to_string(document)
            .map_err(|e| StoreError::Query(format!("failed to serialize document: {e}")))?;

        sqlx::query(UPSERT)
            .bind(path)
            .bind(&data)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn merge(&self, path: &str, patch: &WritePatch) -> Result<(), StoreError> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let row = sqlx::query("SELECT data FROM documents WHERE path = ?")
            .bind(path)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let existing = match row {
            Some(row) => {
                let data: String = row
                    .try_get("data")
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                Some(parse_document(path, &data)?)
            }
            None => None,
        };

        let merged = apply_patch(existing.as_ref(), patch, now);
        let data = serde_json::to_string(&merged)
            .map_err(|e| StoreError::Query(format!("failed to serialize document: {e}")))?;
        let stamp = format_datetime(&now);

        sqlx::query(UPSERT)
            .bind(path)
            .bind(&data)
            .bind(&stamp)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}
