use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    let frontend_dir = state.config.frontend_dir.clone();

    Router::new()
        .route("/", get(handlers::pages::dashboard))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
        // No auth and no rate limit: load balancers poll this
        .route("/health", get(handlers::health))
        .route("/api/vms", get(handlers::vms::list_vms))
        // Static assets (css/js for the dashboard pages)
        .nest_service("/static", ServeDir::new(format!("{}/static", frontend_dir)))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
