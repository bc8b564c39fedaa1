//! Message creation trigger ingress.

use axum::Json;
use axum::extract::{Path, State};
use chatsync_types::event::ChangeEvent;
use serde::Deserialize;
use serde_json::Value;

use crate::http::error::AppError;
use crate::http::handlers::outcome_payload;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Delivery payload for a message creation: the new message document.
#[derive(Debug, Deserialize)]
pub struct MessageCreatedDelivery {
    #[serde(default)]
    pub message: Option<Value>,
}

/// POST /api/v1/triggers/chats/{chat_id}/messages/{message_id}
pub async fn message_created(
    State(state): State<AppState>,
    Path((chat_id, message_id)): Path<(String, String)>,
    Json(delivery): Json<MessageCreatedDelivery>,
) -> Result<ApiResponse<Value>, AppError> {
    let event = ChangeEvent::created(
        format!("chats/{chat_id}/messages/{message_id}"),
        delivery.message,
    );
    let request_id = event.id.to_string();

    let outcome = state.trigger_router.dispatch(&event).await?;
    Ok(ApiResponse::success(outcome_payload(outcome), request_id))
}
