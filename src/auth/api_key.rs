//! Shared-secret guard for machine callers (the external scheduler).

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{app_state::AppState, error::ApiError};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects the request unless `X-API-KEY` equals the configured trigger key.
/// With no key configured every request is rejected.
pub async fn require_trigger_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|header| header.to_str().ok());

    let authorized = match state.config.trigger_api_key() {
        Some(expected) => provided == Some(expected),
        None => {
            warn!("Trigger called but no trigger API key is configured");
            false
        }
    };

    if !authorized {
        warn!(path = %request.uri().path(), "Rejected request with missing or wrong API key");
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }

    Ok(next.run(request).await)
}
