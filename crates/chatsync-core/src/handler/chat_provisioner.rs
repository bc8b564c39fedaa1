//! Chat thread provisioning on booking acceptance.
//!
//! Fires on booking update events; when a booking transitions into
//! `accepted`, ensures the client/provider chat thread exists and links
//! the booking to it. Safe to run any number of times for the same event:
//! the write is a field-level merge, `createdAt` is preserved once set,
//! and `bookingIds` accumulates with union semantics.

use chatsync_types::chat::{DEFAULT_CLIENT_NAME, DEFAULT_PROVIDER_NAME, thread_id};
use chatsync_types::error::StoreError;
use chatsync_types::event::BookingUpdated;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use std::fmt;
use std::sync::Arc;

use crate::store::document_store::DocumentStore;
use crate::store::patch::WritePatch;

/// Why a booking update produced no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Delivery lacked the before or after snapshot.
    MissingSnapshot,
    /// The update was not a strict non-accepted to accepted transition.
    NotAcceptanceTransition,
    /// The accepted booking has no usable clientId/providerId.
    MissingParticipant,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSnapshot => write!(f, "missing snapshot"),
            SkipReason::NotAcceptanceTransition => write!(f, "not an acceptance transition"),
            SkipReason::MissingParticipant => write!(f, "missing participant id"),
        }
    }
}

/// Result of one provisioning invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ProvisionOutcome {
    /// The thread did not exist and was created.
    Created { chat_id: String },
    /// The thread already existed; the booking was merged into it.
    Merged { chat_id: String },
    /// The event was handled without writing.
    Skipped { reason: SkipReason },
}

/// Handler for booking update events.
///
/// Generic over the store port so tests can inject
/// [`MemoryDocumentStore`](crate::store::MemoryDocumentStore).
pub struct ChatProvisioner<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> ChatProvisioner<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Handle one booking update.
    ///
    /// Returns a skip outcome for everything short of a qualifying
    /// transition; store failures propagate so the hosting infrastructure
    /// redelivers.
    pub async fn handle(&self, event: &BookingUpdated) -> Result<ProvisionOutcome, StoreError> {
        let (Some(before), Some(after)) = (&event.before, &event.after) else {
            debug!(
                booking_id = %event.booking_id,
                "booking update without both snapshots, ignoring"
            );
            return Ok(ProvisionOutcome::Skipped {
                reason: SkipReason::MissingSnapshot,
            });
        };

        // Fire only on the edge into accepted, not on every update of an
        // accepted booking.
        if before.is_accepted() || !after.is_accepted() {
            return Ok(ProvisionOutcome::Skipped {
                reason: SkipReason::NotAcceptanceTransition,
            });
        }

        let (Some(client_id), Some(provider_id)) =
            (required_id(&after.client_id), required_id(&after.provider_id))
        else {
            warn!(
                booking_id = %event.booking_id,
                "accepted booking without clientId/providerId, no chat created"
            );
            return Ok(ProvisionOutcome::Skipped {
                reason: SkipReason::MissingParticipant,
            });
        };

        let chat_id = thread_id(client_id, provider_id);
        let path = format!("chats/{chat_id}");

        let existing = self.store.get(&path).await?;
        // The one field a re-run must never reset.
        let existing_created_at = existing
            .as_ref()
            .and_then(|doc| doc.get("createdAt"))
            .filter(|v| !v.is_null())
            .cloned();

        let mut patch = WritePatch::new()
            .set("chatId", json!(chat_id))
            .set("clientId", json!(client_id))
            .set("providerId", json!(provider_id))
            .set("participants", json!([client_id, provider_id]))
            .set("serviceId", optional_string(&after.service_id))
            .set("serviceName", optional_string(&after.service_name))
            .array_union("bookingIds", vec![json!(event.booking_id)])
            .set("clientName", json!(display_name(&after.client_name, DEFAULT_CLIENT_NAME)))
            .set(
                "providerName",
                json!(display_name(&after.provider_name, DEFAULT_PROVIDER_NAME)),
            )
            .set(
                "lastMessage",
                json!(after.last_message.clone().unwrap_or_default()),
            )
            .server_timestamp("lastTimestamp")
            .server_timestamp("updatedAt");

        patch = match existing_created_at {
            Some(created_at) => patch.set("createdAt", created_at),
            None => patch.server_timestamp("createdAt"),
        };

        self.store.merge(&path, &patch).await?;

        if existing.is_none() {
            info!(chat_id = %chat_id, booking_id = %event.booking_id, "chat thread created");
            Ok(ProvisionOutcome::Created { chat_id })
        } else {
            info!(
                chat_id = %chat_id,
                booking_id = %event.booking_id,
                "chat thread already existed, booking merged"
            );
            Ok(ProvisionOutcome::Merged { chat_id })
        }
    }
}

/// A participant id is required and must be non-empty.
fn required_id(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|s| !s.is_empty())
}

/// Display names fall back to a placeholder when absent or empty.
fn display_name(name: &Option<String>, fallback: &str) -> String {
    match name.as_deref().filter(|s| !s.is_empty()) {
        Some(name) => name.to_string(),
        None => fallback.to_string(),
    }
}

/// Optional strings serialize as JSON null when absent or empty.
fn optional_string(value: &Option<String>) -> Value {
    match value.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => json!(s),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsync_types::booking::{BookingSnapshot, BookingStatus};
    use crate::store::MemoryDocumentStore;

    fn snapshot(status: BookingStatus) -> BookingSnapshot {
        BookingSnapshot {
            client_id: Some("c1".to_string()),
            client_name: Some("Ana".to_string()),
            provider_id: Some("p1".to_string()),
            provider_name: Some("Bob".to_string()),
            service_id: Some("s1".to_string()),
            service_name: Some("Plumbing".to_string()),
            status: Some(status),
            last_message: None,
        }
    }

    fn accepted_event(booking_id: &str) -> BookingUpdated {
        BookingUpdated {
            booking_id: booking_id.to_string(),
            before: Some(snapshot(BookingStatus::Pending)),
            after: Some(snapshot(BookingStatus::Accepted)),
        }
    }

    fn provisioner() -> (Arc<MemoryDocumentStore>, ChatProvisioner<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        (store.clone(), ChatProvisioner::new(store))
    }

    #[tokio::test]
    async fn acceptance_creates_thread() {
        let (store, handler) = provisioner();

        let outcome = handler.handle(&accepted_event("b1")).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Created {
                chat_id: "c1_p1".to_string()
            }
        );

        let doc = store.get("chats/c1_p1").await.unwrap().unwrap();
        assert_eq!(doc["chatId"], "c1_p1");
        assert_eq!(doc["participants"], serde_json::json!(["c1", "p1"]));
        assert_eq!(doc["bookingIds"], serde_json::json!(["b1"]));
        assert_eq!(doc["clientName"], "Ana");
        assert_eq!(doc["serviceName"], "Plumbing");
        assert_eq!(doc["lastMessage"], "");
        assert!(doc["createdAt"].is_string());
        assert!(doc["lastTimestamp"].is_string());
    }

    #[tokio::test]
    async fn redelivery_preserves_created_at_and_booking_ids() {
        let (store, handler) = provisioner();

        handler.handle(&accepted_event("b1")).await.unwrap();
        let first = store.get("chats/c1_p1").await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let outcome = handler.handle(&accepted_event("b1")).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Merged {
                chat_id: "c1_p1".to_string()
            }
        );

        let second = store.get("chats/c1_p1").await.unwrap().unwrap();
        assert_eq!(second["createdAt"], first["createdAt"]);
        assert_eq!(second["bookingIds"], serde_json::json!(["b1"]));
    }

    #[tokio::test]
    async fn second_booking_for_same_pair_reuses_thread() {
        let (store, handler) = provisioner();

        handler.handle(&accepted_event("b1")).await.unwrap();
        let first = store.get("chats/c1_p1").await.unwrap().unwrap();

        let mut other = accepted_event("b2");
        if let Some(after) = other.after.as_mut() {
            after.service_id = Some("s2".to_string());
            after.service_name = Some("Painting".to_string());
        }
        let outcome = handler.handle(&other).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Merged {
                chat_id: "c1_p1".to_string()
            }
        );

        let doc = store.get("chats/c1_p1").await.unwrap().unwrap();
        assert_eq!(doc["bookingIds"], serde_json::json!(["b1", "b2"]));
        assert_eq!(doc["createdAt"], first["createdAt"]);
        // Roster reflects the latest accepted booking.
        assert_eq!(doc["serviceName"], "Painting");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn accepted_to_accepted_is_ignored() {
        let (store, handler) = provisioner();

        let event = BookingUpdated {
            booking_id: "b1".to_string(),
            before: Some(snapshot(BookingStatus::Accepted)),
            after: Some(snapshot(BookingStatus::Accepted)),
        };
        let outcome = handler.handle(&event).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Skipped {
                reason: SkipReason::NotAcceptanceTransition
            }
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn transition_away_from_accepted_is_ignored() {
        let (store, handler) = provisioner();

        let event = BookingUpdated {
            booking_id: "b1".to_string(),
            before: Some(snapshot(BookingStatus::Accepted)),
            after: Some(snapshot(BookingStatus::Cancelled)),
        };
        let outcome = handler.handle(&event).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Skipped {
                reason: SkipReason::NotAcceptanceTransition
            }
        );
        assert!(store.is_empty());

        // Neither is a transition that never touches accepted.
        let event = BookingUpdated {
            booking_id: "b1".to_string(),
            before: Some(snapshot(BookingStatus::Pending)),
            after: Some(snapshot(BookingStatus::Declined)),
        };
        let outcome = handler.handle(&event).await.unwrap();
        assert!(matches!(outcome, ProvisionOutcome::Skipped { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_snapshot_is_silent_noop() {
        let (store, handler) = provisioner();

        let event = BookingUpdated {
            booking_id: "b1".to_string(),
            before: None,
            after: Some(snapshot(BookingStatus::Accepted)),
        };
        let outcome = handler.handle(&event).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Skipped {
                reason: SkipReason::MissingSnapshot
            }
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_participant_id_skips_without_write() {
        let (store, handler) = provisioner();

        let mut event = accepted_event("b1");
        if let Some(after) = event.after.as_mut() {
            after.provider_id = Some(String::new());
        }
        let outcome = handler.handle(&event).await.unwrap();
        assert_eq!(
            outcome,
            ProvisionOutcome::Skipped {
                reason: SkipReason::MissingParticipant
            }
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn sparse_booking_gets_placeholder_names_and_null_service() {
        let (store, handler) = provisioner();

        let event = BookingUpdated {
            booking_id: "b1".to_string(),
            before: Some(BookingSnapshot {
                status: Some(BookingStatus::Pending),
                ..Default::default()
            }),
            after: Some(BookingSnapshot {
                client_id: Some("c1".to_string()),
                provider_id: Some("p1".to_string()),
                status: Some(BookingStatus::Accepted),
                ..Default::default()
            }),
        };
        handler.handle(&event).await.unwrap();

        let doc = store.get("chats/c1_p1").await.unwrap().unwrap();
        assert_eq!(doc["clientName"], "Client");
        assert_eq!(doc["providerName"], "Provider");
        assert!(doc["serviceId"].is_null());
        assert!(doc["serviceName"].is_null());
    }

    #[tokio::test]
    async fn provisioning_does_not_clobber_summary_fields() {
        let (store, handler) = provisioner();

        handler.handle(&accepted_event("b1")).await.unwrap();
        // Summarizer owns these after creation.
        store
            .merge(
                "chats/c1_p1",
                &WritePatch::new()
                    .set("lastMessage", json!("Hello"))
                    .set("lastSenderId", json!("c1")),
            )
            .await
            .unwrap();

        // A later booking between the same pair goes accepted. lastSenderId
        // is not in the provisioner's patch, so it must survive; the
        // placeholder lastMessage does get rewritten (booking-sourced).
        handler.handle(&accepted_event("b2")).await.unwrap();
        let doc = store.get("chats/c1_p1").await.unwrap().unwrap();
        assert_eq!(doc["lastSenderId"], "c1");
    }
}
