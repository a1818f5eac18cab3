use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::handlers::ErrorResponse;
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Extractor that requires a valid dashboard session.
///
/// Add `_session: SessionUser` to a handler's parameters to gate it. API
/// routes get a 401 JSON body on rejection; page handlers use
/// [`require_page_session`] instead so browsers get a login redirect.
pub struct SessionUser;

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for SessionUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_cookie(&parts.headers).ok_or(AuthError::MissingSession)?;

        if state.sessions.validate(&token) {
            Ok(SessionUser)
        } else {
            Err(AuthError::InvalidSession)
        }
    }
}

pub enum AuthError {
    MissingSession,
    InvalidSession,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingSession => "Authentication required",
            AuthError::InvalidSession => "Invalid or expired session",
        };
        (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Pull the session token out of the Cookie header
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix(prefix.as_str()))
        .map(|token| token.to_string())
}

/// Session gate for HTML pages: unauthenticated browsers are bounced to the
/// login form, carrying the original path for the post-login redirect.
pub fn require_page_session(
    state: &AppState,
    headers: &HeaderMap,
    original_path: &str,
) -> Result<(), Redirect> {
    match session_cookie(headers) {
        Some(token) if state.sessions.validate(&token) => Ok(()),
        _ => Err(Redirect::to(&format!("/login?next={}", original_path))),
    }
}

/// Rate-limit and audit key for a client: first X-Forwarded-For hop when the
/// server sits behind a proxy, otherwise the socket peer address.
pub fn client_key(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}
