//! Declarative trigger routing table.
//!
//! `TriggerRouter` binds (path pattern, change kind) pairs to handlers at
//! construction time: booking updates feed the chat provisioner, message
//! creations feed the summarizer. Dispatch matches an incoming change
//! event against the table, decodes its snapshots into the typed payload,
//! and invokes the bound handler. Unmatched events and undecodable
//! snapshots are recoverable no-ops, never errors.

use chatsync_types::error::StoreError;
use chatsync_types::event::{BookingUpdated, ChangeEvent, ChangeKind, MessageCreated};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatch::path::PathPattern;
use crate::handler::chat_provisioner::{ChatProvisioner, ProvisionOutcome};
use crate::handler::message_summarizer::{MessageSummarizer, SummaryOutcome};
use crate::store::document_store::DocumentStore;

/// Which handler a route is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandlerKind {
    ProvisionChat,
    SummarizeMessage,
}

/// One row of the routing table.
struct Route {
    pattern: PathPattern,
    kind: ChangeKind,
    handler: HandlerKind,
}

/// Result of dispatching one change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The chat provisioner ran.
    Provisioned(ProvisionOutcome),
    /// The message summarizer ran.
    Summarized(SummaryOutcome),
    /// No route matched the event's path and kind.
    Unmatched,
    /// A route matched but the snapshots did not decode; logged no-op.
    Undecodable,
}

/// Routing table built once at startup.
///
/// Owns one instance of each handler, all writing through the same shared
/// store handle.
pub struct TriggerRouter<S: DocumentStore> {
    provisioner: ChatProvisioner<S>,
    summarizer: MessageSummarizer<S>,
    routes: Vec<Route>,
}

impl<S: DocumentStore> TriggerRouter<S> {
    /// Build the routing table over the given store.
    pub fn new(store: Arc<S>) -> Self {
        let routes = vec![
            Route {
                pattern: PathPattern::parse("bookings/{bookingId}"),
                kind: ChangeKind::Updated,
                handler: HandlerKind::ProvisionChat,
            },
            Route {
                pattern: PathPattern::parse("chats/{chatId}/messages/{messageId}"),
                kind: ChangeKind::Created,
                handler: HandlerKind::SummarizeMessage,
            },
        ];

        Self {
            provisioner: ChatProvisioner::new(store.clone()),
            summarizer: MessageSummarizer::new(store),
            routes,
        }
    }

    /// Human-readable routing table, for startup logging.
    pub fn describe_routes(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|route| {
                let handler = match route.handler {
                    HandlerKind::ProvisionChat => "chat provisioner",
                    HandlerKind::SummarizeMessage => "message summarizer",
                };
                format!("{} on {} -> {handler}", route.kind, route.pattern)
            })
            .collect()
    }

    /// Route one change event to its handler.
    pub async fn dispatch(&self, event: &ChangeEvent) -> Result<DispatchOutcome, StoreError> {
        for route in &self.routes {
            if route.kind != event.kind {
                continue;
            }
            let Some(params) = route.pattern.match_path(&event.path) else {
                continue;
            };

            return match route.handler {
                HandlerKind::ProvisionChat => self.dispatch_booking(event, &params).await,
                HandlerKind::SummarizeMessage => self.dispatch_message(event, &params).await,
            };
        }

        debug!(event_id = %event.id, path = %event.path, kind = %event.kind, "no trigger route matched");
        Ok(DispatchOutcome::Unmatched)
    }

    async fn dispatch_booking(
        &self,
        event: &ChangeEvent,
        params: &HashMap<String, String>,
    ) -> Result<DispatchOutcome, StoreError> {
        let (Ok(before), Ok(after)) = (
            decode_snapshot(&event.before),
            decode_snapshot(&event.after),
        ) else {
            warn!(event_id = %event.id, path = %event.path, "undecodable booking snapshots, ignoring");
            return Ok(DispatchOutcome::Undecodable);
        };

        let payload = BookingUpdated {
            booking_id: param(params, "bookingId"),
            before,
            after,
        };
        self.provisioner
            .handle(&payload)
            .await
            .map(DispatchOutcome::Provisioned)
    }

    async fn dispatch_message(
        &self,
        event: &ChangeEvent,
        params: &HashMap<String, String>,
    ) -> Result<DispatchOutcome, StoreError> {
        let Ok(message) = decode_snapshot(&event.after) else {
            warn!(event_id = %event.id, path = %event.path, "undecodable message snapshot, ignoring");
            return Ok(DispatchOutcome::Undecodable);
        };

        let payload = MessageCreated {
            chat_id: param(params, "chatId"),
            message_id: param(params, "messageId"),
            message,
        };
        self.summarizer
            .handle(&payload)
            .await
            .map(DispatchOutcome::Summarized)
    }
}

/// Decode an optional raw snapshot; JSON null counts as absent.
fn decode_snapshot<T: DeserializeOwned>(raw: &Option<Value>) -> Result<Option<T>, serde_json::Error> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some),
    }
}

/// Captured parameters are guaranteed by the pattern; an empty fallback
/// keeps the lookup total.
fn param(params: &HashMap<String, String>, name: &str) -> String {
    params.get(name).cloned().unwrap_or_default()
}
