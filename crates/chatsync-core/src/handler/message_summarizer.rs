//! Last-message summary maintenance.
//!
//! Fires on message creation events and merge-writes the denormalized
//! `lastMessage`/`lastSenderId`/`lastTimestamp` summary onto the parent
//! chat thread. Deliberately writes blind -- no prior read -- because the
//! summary fields belong to this handler alone and the merge cannot touch
//! anything else.

use chatsync_types::error::StoreError;
use chatsync_types::event::MessageCreated;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use std::sync::Arc;

use crate::store::document_store::DocumentStore;
use crate::store::patch::{WritePatch, timestamp_value};

/// Result of one summarizer invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SummaryOutcome {
    /// The thread's summary fields were rewritten.
    Updated { chat_id: String },
    /// The delivery carried no message payload; nothing written.
    Skipped,
}

/// Handler for message creation events.
pub struct MessageSummarizer<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> MessageSummarizer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handle one message creation.
    ///
    /// Re-invocation writes the same values again (messages are immutable)
    /// except `updatedAt`, which advances -- acceptable for advisory
    /// metadata.
    pub async fn handle(&self, event: &MessageCreated) -> Result<SummaryOutcome, StoreError> {
        let Some(message) = &event.message else {
            debug!(
                chat_id = %event.chat_id,
                message_id = %event.message_id,
                "message creation without payload, ignoring"
            );
            return Ok(SummaryOutcome::Skipped);
        };

        let sender_id = match message.sender_id.as_deref().filter(|s| !s.is_empty()) {
            Some(sender) => json!(sender),
            // Absent sender stays absent; never fabricate one.
            None => Value::Null,
        };

        let mut patch = WritePatch::new()
            .set(
                "lastMessage",
                json!(message.text.clone().unwrap_or_default()),
            )
            .set("lastSenderId", sender_id)
            .server_timestamp("updatedAt");

        // The message's own timestamp wins when present; the store clock
        // covers clients that omit it.
        patch = match message.created_at {
            Some(created_at) => patch.set("lastTimestamp", timestamp_value(created_at)),
            None => patch.server_timestamp("lastTimestamp"),
        };

        self.store
            .merge(&format!("chats/{}", event.chat_id), &patch)
            .await?;

        debug!(
            chat_id = %event.chat_id,
            message_id = %event.message_id,
            "chat summary updated"
        );
        Ok(SummaryOutcome::Updated {
            chat_id: event.chat_id.clone(),
        })
    }
}
