pub mod auth;
pub mod pages;
pub mod vms;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::prism::PrismError;
use crate::AppState;

/// Error response - {"error": "message"} everywhere
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API error type
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn too_many_requests(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<PrismError> for ApiError {
    fn from(err: PrismError) -> Self {
        // Detail goes to the log; clients get a generic message.
        tracing::error!("Prism request failed: {}", err);
        match err {
            PrismError::Unreachable(_) | PrismError::Unavailable { .. } => {
                Self::bad_gateway("API connection failed")
            }
            PrismError::Malformed(_) => Self::internal("Server error"),
        }
    }
}

/// GET /health - no auth, exempt from rate limiting.
///
/// Probes Prism directly instead of going through the cluster cache: the
/// cache's keep-stale-on-failure behavior would mask an outage.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.prism.list_clusters().await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": timestamp,
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "error": e.kind(),
                    "timestamp": timestamp,
                })),
            )
                .into_response()
        }
    }
}
