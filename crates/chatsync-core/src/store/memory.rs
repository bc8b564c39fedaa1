//! In-memory document store.
//!
//! DashMap-backed implementation of [`DocumentStore`] for handler tests
//! and local development. Merges are atomic per path: the map entry stays
//! locked for the duration of the read-modify-write fold.

use chatsync_types::error::StoreError;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

use crate::store::document_store::DocumentStore;
use crate::store::patch::{WritePatch, apply_patch};

/// Non-durable [`DocumentStore`] keyed by document path.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: DashMap<String, Value>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl std::fmt::Debug for MemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocumentStore")
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.get(path).map(|doc| doc.value().clone()))
    }

    async fn set(&self, path: &str, document: &Value) -> Result<(), StoreError> {
        self.documents.insert(path.to_string(), document.clone());
        Ok(())
    }

    async fn merge(&self, path: &str, patch: &WritePatch) -> Result<(), StoreError> {
        let now = Utc::now();
        match self.documents.entry(path.to_string()) {
            Entry::Occupied(mut entry) => {
                let merged = apply_patch(Some(entry.get()), patch, now);
                entry.insert(merged);
            }
            Entry::Vacant(entry) => {
                entry.insert(apply_patch(None, patch, now));
            }
        }
        Ok(())
    }
}
