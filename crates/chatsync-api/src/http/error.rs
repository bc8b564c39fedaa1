//! Application error type mapping to HTTP status codes.
//!
//! Only store failures surface as HTTP errors: a 500 tells the delivery
//! infrastructure to redeliver, which is safe because every handler write
//! is an idempotent merge. Everything else (malformed payloads, guard
//! skips, unmatched paths) is acknowledged with 200 so redelivery is not
//! attempted on events that can never succeed differently.

use axum::response::{IntoResponse, Response};
use chatsync_types::error::StoreError;
use uuid::Uuid;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Document store read or write failure.
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Store(e) = self;
        tracing::error!(error = %e, "trigger handling failed, delivery will be retried");
        ApiResponse::error("STORE_ERROR", &e.to_string(), Uuid::now_v7().to_string())
            .into_response()
    }
}
