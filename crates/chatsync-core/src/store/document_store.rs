//! Document store trait definition.
//!
//! Defines the interface the reactive handlers persist through.
//! The production implementation lives in chatsync-infra.

use chatsync_types::error::StoreError;
use serde_json::Value;

use crate::store::patch::WritePatch;

/// Trait for path-addressed JSON document persistence.
///
/// Documents live under slash-delimited paths (`bookings/{bookingId}`,
/// `chats/{chatId}`, `chats/{chatId}/messages/{messageId}`). Uses native
/// async fn in traits (RPITIT, Rust 2024 edition).
///
/// `merge` is the only write the handlers use: implementations must apply
/// the patch atomically with respect to other merges on the same path, so
/// that two concurrent writers touching disjoint fields cannot clobber
/// each other (see [`crate::store::patch::apply_patch`]).
pub trait DocumentStore: Send + Sync {
    /// Get the document at `path`. Returns None if it does not exist.
    fn get(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Write a whole document, replacing any existing one.
    ///
    /// Used by external-writer fixtures (bookings and messages are owned
    /// by collaborators outside this core); the handlers themselves only
    /// ever merge.
    fn set(
        &self,
        path: &str,
        document: &Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Atomically fold `patch` into the document at `path`, creating it
    /// if absent. Fields not named in the patch are left untouched.
    fn merge(
        &self,
        path: &str,
        patch: &WritePatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
