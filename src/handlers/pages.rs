use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::require_page_session;
use crate::AppState;

/// GET / - the dashboard page, session required
pub async fn dashboard(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers, "/") {
        return redirect.into_response();
    }
    serve_page(&state.config.frontend_dir, "index.html").await
}

/// Read a page out of the frontend directory. The HTML itself is deployment
/// content, not application logic.
pub async fn serve_page(frontend_dir: &str, file: &str) -> Response {
    match tokio::fs::read_to_string(format!("{}/{}", frontend_dir, file)).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("Failed to read {}/{}: {}", frontend_dir, file, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "page unavailable").into_response()
        }
    }
}
