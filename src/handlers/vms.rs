use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::{client_key, SessionUser};
use crate::models::NormalizedVm;
use crate::AppState;

use super::ApiError;

/// GET /api/vms - session required, rate-limited.
///
/// Returns the sorted array of powered-on VMs. Upstream trouble maps to 502,
/// anything else unexpected to 500, both with generic bodies.
pub async fn list_vms(
    _session: SessionUser,
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<Vec<NormalizedVm>>, ApiError> {
    let origin = client_key(&headers, &addr);
    if !state.api_limiter.allow(&origin) {
        return Err(ApiError::too_many_requests("Too many requests"));
    }

    let vms = state.vms.fetch_all().await?;
    Ok(Json(vms))
}
