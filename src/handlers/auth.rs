use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::{client_key, session_cookie, SESSION_COOKIE};
use crate::models::LoginForm;
use crate::AppState;

use super::{pages, ApiError};

/// GET /login - renders the login form. An already-authenticated browser is
/// sent straight back home.
pub async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_cookie(&headers) {
        if state.sessions.validate(&token) {
            return Redirect::to("/").into_response();
        }
    }
    pages::serve_page(&state.config.frontend_dir, "login.html").await
}

/// POST /login - rate-limited credential check against the dashboard
/// credentials (distinct from the Prism credentials).
pub async fn login(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let origin = client_key(&headers, &addr);

    // Too many attempts is a distinct signal; credentials are not even
    // compared once the limit is hit.
    if !state.login_limiter.allow(&origin) {
        tracing::warn!(client = %origin, "Login rate limit exceeded");
        return Err(ApiError::too_many_requests("Too many login attempts"));
    }

    let valid = form.username == state.config.dashboard_username
        && form.password == state.config.dashboard_password;

    if !valid {
        // Generic outcome: never reveal which of the two fields was wrong
        tracing::warn!(client = %origin, "Failed login attempt");
        return Ok(Redirect::to(&format!(
            "/login?error=invalid&next={}",
            safe_next(form.next.as_deref())
        ))
        .into_response());
    }

    let token = state.sessions.create();
    tracing::info!(client = %origin, "Dashboard login");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        state.config.session_lifetime_hours * 3600
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal(format!("cookie encoding error: {}", e)))?;

    let mut response = Redirect::to(safe_next(form.next.as_deref())).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// GET /logout - clears the session unconditionally and returns to the
/// login form.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_cookie(&headers) {
        state.sessions.destroy(&token);
    }

    let mut response = Redirect::to("/login").into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; HttpOnly; Max-Age=0"),
    );
    response
}

/// Only absolute local paths are valid post-login targets; anything else
/// (external URLs, scheme-relative "//host") falls back to home.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}
