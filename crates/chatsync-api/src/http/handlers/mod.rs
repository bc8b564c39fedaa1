//! Trigger ingress handlers.

pub mod booking;
pub mod message;

use chatsync_core::dispatch::DispatchOutcome;
use serde_json::{Value, json};

/// Serialize a dispatch outcome into the response payload.
pub(crate) fn outcome_payload(outcome: DispatchOutcome) -> Value {
    match outcome {
        DispatchOutcome::Provisioned(outcome) => {
            serde_json::to_value(outcome).unwrap_or(Value::Null)
        }
        DispatchOutcome::Summarized(outcome) => {
            serde_json::to_value(outcome).unwrap_or(Value::Null)
        }
        DispatchOutcome::Unmatched => json!({"result": "unmatched"}),
        DispatchOutcome::Undecodable => json!({"result": "ignored"}),
    }
}
