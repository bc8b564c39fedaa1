//! Chat thread and message document types.
//!
//! A chat thread is the derived aggregate this backend owns: one document
//! per client/provider pair, provisioned when a booking is accepted and
//! summarized on every new message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown when an accepted booking carries no client name.
pub const DEFAULT_CLIENT_NAME: &str = "Client";

/// Placeholder shown when an accepted booking carries no provider name.
pub const DEFAULT_PROVIDER_NAME: &str = "Provider";

/// Derive the deterministic thread id for a client/provider pair.
///
/// The key is the pair, not the booking: however many bookings the two
/// parties share, they converse in a single thread. Ids assigned by the
/// store never contain `_`, so the concatenation cannot collide.
pub fn thread_id(client_id: &str, provider_id: &str) -> String {
    format!("{client_id}_{provider_id}")
}

/// A chat thread document (`chats/{chatId}`).
///
/// Identity and roster fields are written by the provisioner; the
/// `lastMessage`/`lastSenderId`/`lastTimestamp` summary is owned by the
/// message summarizer after the initial placeholder write. `createdAt` is
/// stamped once on first creation and never reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThread {
    pub chat_id: String,
    pub client_id: String,
    pub provider_id: String,
    pub participants: Vec<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    /// Every booking that routed to this thread. Grow-only, no duplicates.
    pub booking_ids: Vec<String>,
    pub client_name: String,
    pub provider_name: String,
    pub last_message: String,
    #[serde(default)]
    pub last_sender_id: Option<String>,
    #[serde(default)]
    pub last_timestamp: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A point-in-time snapshot of a message document
/// (`chats/{chatId}/messages/{messageId}`).
///
/// Messages are created by the external messaging UI and immutable
/// afterwards; the summarizer only reads them. Fields are optional because
/// clients have been observed to omit any of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageSnapshot {
    pub text: Option<String>,
    pub sender_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_id_is_deterministic_per_pair() {
        assert_eq!(thread_id("c1", "p1"), "c1_p1");
        assert_eq!(thread_id("c1", "p1"), thread_id("c1", "p1"));
        assert_ne!(thread_id("c1", "p2"), thread_id("c1", "p1"));
        // Order matters: client always comes first.
        assert_ne!(thread_id("p1", "c1"), thread_id("c1", "p1"));
    }

    #[test]
    fn thread_deserializes_without_summary_sender() {
        // A freshly provisioned thread has no lastSenderId yet.
        let thread: ChatThread = serde_json::from_value(serde_json::json!({
            "chatId": "c1_p1",
            "clientId": "c1",
            "providerId": "p1",
            "participants": ["c1", "p1"],
            "serviceId": "s1",
            "serviceName": "Plumbing",
            "bookingIds": ["b1"],
            "clientName": "Ana",
            "providerName": "Bob",
            "lastMessage": "",
            "lastTimestamp": "2025-03-01T10:00:00Z",
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-03-01T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(thread.chat_id, "c1_p1");
        assert_eq!(thread.booking_ids, vec!["b1"]);
        assert!(thread.last_sender_id.is_none());
    }

    #[test]
    fn message_snapshot_defaults_to_empty() {
        let msg: MessageSnapshot = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(msg.text.is_none());
        assert!(msg.sender_id.is_none());
        assert!(msg.created_at.is_none());
    }

    #[test]
    fn message_snapshot_parses_timestamp() {
        let msg: MessageSnapshot = serde_json::from_value(serde_json::json!({
            "text": "Hello",
            "senderId": "c1",
            "createdAt": "2025-03-01T10:05:00Z",
        }))
        .unwrap();
        assert_eq!(msg.text.as_deref(), Some("Hello"));
        assert!(msg.created_at.is_some());
    }
}
