//! Booking update trigger ingress.

use axum::Json;
use axum::extract::{Path, State};
use chatsync_types::event::ChangeEvent;
use serde::Deserialize;
use serde_json::Value;

use crate::http::error::AppError;
use crate::http::handlers::outcome_payload;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Delivery payload for a booking update: the pre- and post-update
/// document snapshots. Either may be absent (malformed trigger).
#[derive(Debug, Deserialize)]
pub struct BookingUpdateDelivery {
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

/// POST /api/v1/triggers/bookings/{booking_id}
pub async fn booking_updated(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(delivery): Json<BookingUpdateDelivery>,
) -> Result<ApiResponse<Value>, AppError> {
    let event = ChangeEvent::updated(
        format!("bookings/{booking_id}"),
        delivery.before,
        delivery.after,
    );
    let request_id = event.id.to_string();

    let outcome = state.trigger_router.dispatch(&event).await?;
    Ok(ApiResponse::success(outcome_payload(outcome), request_id))
}
