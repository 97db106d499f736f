//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use socsync_core::SyncStats;
use socsync_engine::AbortedSync;

/// An error response carrying the standard envelope.
///
/// Aborted runs keep their partial statistics in the body so callers can
/// see how far the run got before the fault.
pub struct ApiError {
    status: StatusCode,
    message: String,
    stats: Option<SyncStats>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            stats: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            stats: None,
        }
    }
}

impl From<AbortedSync> for ApiError {
    fn from(aborted: AbortedSync) -> Self {
        ApiError {
            status: StatusCode::BAD_GATEWAY,
            message: aborted.error.to_string(),
            stats: Some(aborted.stats),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.message,
            "statistics": self.stats,
        });
        (self.status, Json(body)).into_response()
    }
}
