//! Change events delivered by the hosting trigger infrastructure.
//!
//! A `ChangeEvent` is the raw store-level notification (path plus JSON
//! snapshots); `BookingUpdated` and `MessageCreated` are the typed payloads
//! the dispatch layer decodes them into before invoking a handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::booking::BookingSnapshot;
use crate::chat::MessageSnapshot;

/// What happened to the document at the event's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "created"),
            ChangeKind::Updated => write!(f, "updated"),
            ChangeKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// A document change notification.
///
/// `before`/`after` are raw JSON snapshots; either may be absent (a created
/// document has no `before`, a malformed delivery may lack both). The `id`
/// is a per-delivery correlation id for log tracing -- redeliveries of the
/// same underlying change get fresh ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub id: Uuid,
    pub kind: ChangeKind,
    /// Slash-delimited document path, e.g. `bookings/b1`.
    pub path: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Build a creation event (no `before` snapshot).
    pub fn created(path: impl Into<String>, after: Option<Value>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: ChangeKind::Created,
            path: path.into(),
            before: None,
            after,
            occurred_at: Utc::now(),
        }
    }

    /// Build an update event carrying both snapshots.
    pub fn updated(
        path: impl Into<String>,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: ChangeKind::Updated,
            path: path.into(),
            before,
            after,
            occurred_at: Utc::now(),
        }
    }
}

/// Typed payload of an update event on `bookings/{bookingId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingUpdated {
    pub booking_id: String,
    pub before: Option<BookingSnapshot>,
    pub after: Option<BookingSnapshot>,
}

/// Typed payload of a creation event on
/// `chats/{chatId}/messages/{messageId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreated {
    pub chat_id: String,
    pub message_id: String,
    pub message: Option<MessageSnapshot>,
}
