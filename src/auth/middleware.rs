use axum::{
    Json,
    extract::FromRequestParts,
    http::{
        StatusCode,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};

use crate::{app_state::AppState, auth::dtos::ErrorResponse};

pub const SESSION_COOKIE: &str = "sdmn_session";

/// The caller behind a valid session, resolved from the session cookie or a
/// bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

impl AuthenticatedUser {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)?;

        let claims = state
            .jwt
            .verify_token(&token)
            .map_err(|_| AuthError::InvalidToken)?;
        let user_id = claims.user_id().map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(user_id))
    }
}

/// An `Authorization` header wins over the cookie; when present it must be a
/// bearer token.
fn session_token(parts: &Parts) -> Result<String, AuthError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header.to_str().map_err(|_| AuthError::InvalidTokenFormat)?;
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidTokenFormat)?;
        return Ok(token.to_string());
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
        .ok_or(AuthError::MissingToken)
}

/// `Set-Cookie` value for a fresh session. Without a max age the cookie
/// lives as long as the browser session.
pub fn session_cookie(token: &str, max_age_secs: Option<i64>) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/");
    if let Some(max_age) = max_age_secs {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop the session.
pub fn expired_session_cookie() -> String {
    session_cookie("", Some(0))
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidTokenFormat,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Authentication required",
            AuthError::InvalidTokenFormat => "Invalid token format",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
