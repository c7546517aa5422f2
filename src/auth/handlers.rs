use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    auth::{
        dtos::{
            ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
            UserResponse,
        },
        jwt::SESSION_TTL_HOURS,
        middleware::{AuthenticatedUser, expired_session_cookie, session_cookie},
    },
    error::ApiError,
    repositories::PersistenceError,
};

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

fn already_registered() -> ApiError {
    ApiError::Conflict("Username or email already registered".to_string())
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate().map_err(ApiError::BadRequest)?;

    if state
        .user_repo
        .find_by_username_or_email(&payload.username, &payload.email)
        .await?
        .is_some()
    {
        return Err(already_registered());
    }

    let pw_hash = state
        .passwords
        .hash(&payload.password)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    // the pre-check can race with a concurrent registration; the unique
    // constraints still decide
    let user = state
        .user_repo
        .create(&payload.username, &payload.email, &pw_hash)
        .await
        .map_err(|e| match e {
            PersistenceError::Conflict(_) => already_registered(),
            other => other.into(),
        })?;

    info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started; token also set as cookie", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Rate limited", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    payload.validate().map_err(ApiError::BadRequest)?;

    let user = state
        .user_repo
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let (is_valid, needs_rehash) = state
        .passwords
        .verify(&payload.password, &user.pw_hash)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !is_valid {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }
    if needs_rehash {
        info!(user_id = user.id, "Stored password hash uses outdated parameters");
    }

    let token = state
        .jwt
        .generate_token(user.id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let max_age = payload.remember.then_some(SESSION_TTL_HOURS * 3600);
    let cookie = session_cookie(&token, max_age);

    info!(user_id = user.id, remember = payload.remember, "User logged in");
    Ok(([(SET_COOKIE, cookie)], Json(LoginResponse { token })))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn logout(user: AuthenticatedUser) -> impl IntoResponse {
    info!(user_id = user.user_id, "User logged out");
    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_repo
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}
