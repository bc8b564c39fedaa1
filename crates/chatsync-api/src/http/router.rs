//! Axum router configuration with middleware.
//!
//! Trigger ingress routes live under `/api/v1/`; the liveness probe sits
//! at `/health` outside the nest. Middleware: CORS and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/triggers/bookings/{booking_id}",
            post(handlers::booking::booking_updated),
        )
        .route(
            "/triggers/chats/{chat_id}/messages/{message_id}",
            post(handlers::message::message_created),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe. Fixed payload, no state, no business
/// logic; failure modes are the hosting infrastructure's alone.
async fn health_check() -> &'static str {
    "chatsync OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_returns_fixed_body() {
        assert_eq!(health_check().await, "chatsync OK");
    }
}
