use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::info;

use crate::{
    app_state::AppState,
    auth::{
        AuthenticatedUser,
        dtos::{ErrorResponse, MessageResponse},
    },
    entities::{Monitor, MonitorRun},
    error::ApiError,
    monitors::dtos::{CreateMonitorRequest, RunsQuery, UpdateMonitorRequest},
    repositories::PersistenceError,
};

const NOT_OWNED: &str = "Monitor not found or does not belong to the current user";

fn not_owned() -> ApiError {
    ApiError::not_found(NOT_OWNED)
}

#[utoipa::path(
    get,
    path = "/monitors",
    tag = "monitors",
    responses(
        (status = 200, description = "Monitors owned by the caller", body = [Monitor]),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn list_monitors(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Monitor>>, ApiError> {
    let monitors = state.monitor_repo.list_by_owner(user.user_id).await?;
    Ok(Json(monitors))
}

#[utoipa::path(
    post,
    path = "/monitors",
    tag = "monitors",
    request_body = CreateMonitorRequest,
    responses(
        (status = 201, description = "Monitor created", body = Monitor),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 409, description = "Integrity conflict", body = ErrorResponse)
    )
)]
pub async fn create_monitor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateMonitorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Monitor>), ApiError> {
    let Json(payload) = payload?;
    let new_monitor = payload.validate().map_err(ApiError::BadRequest)?;

    let monitor = state
        .monitor_repo
        .create(user.user_id, &new_monitor)
        .await
        .map_err(|e| match e {
            PersistenceError::Conflict(_) => {
                ApiError::Conflict("Database integrity error.".to_string())
            }
            other => other.into(),
        })?;

    info!(monitor_id = monitor.id, user_id = user.user_id, "Monitor created");
    Ok((StatusCode::CREATED, Json(monitor)))
}

#[utoipa::path(
    get,
    path = "/monitors/{id}",
    tag = "monitors",
    params(("id" = i64, Path, description = "Monitor id")),
    responses(
        (status = 200, description = "The monitor", body = Monitor),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Absent or owned by someone else", body = ErrorResponse)
    )
)]
pub async fn get_monitor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Monitor>, ApiError> {
    let monitor = state
        .monitor_repo
        .get_owned(id, user.user_id)
        .await?
        .ok_or_else(not_owned)?;
    Ok(Json(monitor))
}

#[utoipa::path(
    put,
    path = "/monitors/{id}",
    tag = "monitors",
    params(("id" = i64, Path, description = "Monitor id")),
    request_body = UpdateMonitorRequest,
    responses(
        (status = 200, description = "Updated monitor", body = Monitor),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Absent or owned by someone else", body = ErrorResponse)
    )
)]
pub async fn update_monitor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateMonitorRequest>, JsonRejection>,
) -> Result<Json<Monitor>, ApiError> {
    let Json(payload) = payload?;
    let changes = payload.validate().map_err(ApiError::BadRequest)?;

    let monitor = state
        .monitor_repo
        .update(id, user.user_id, &changes)
        .await?
        .ok_or_else(not_owned)?;

    info!(monitor_id = id, user_id = user.user_id, "Monitor updated");
    Ok(Json(monitor))
}

#[utoipa::path(
    delete,
    path = "/monitors/{id}",
    tag = "monitors",
    params(("id" = i64, Path, description = "Monitor id")),
    responses(
        (status = 200, description = "Monitor deleted", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Absent or owned by someone else", body = ErrorResponse)
    )
)]
pub async fn delete_monitor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.monitor_repo.delete(id, user.user_id).await? {
        return Err(not_owned());
    }

    info!(monitor_id = id, user_id = user.user_id, "Monitor deleted");
    Ok(Json(MessageResponse {
        message: format!("Monitor {id} deleted successfully."),
    }))
}

#[utoipa::path(
    get,
    path = "/monitors/{id}/runs",
    tag = "monitors",
    params(("id" = i64, Path, description = "Monitor id"), RunsQuery),
    responses(
        (status = 200, description = "Run history, newest first", body = [MonitorRun]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Absent or owned by someone else", body = ErrorResponse)
    )
)]
pub async fn list_runs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    query: Result<Query<RunsQuery>, QueryRejection>,
) -> Result<Json<Vec<MonitorRun>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let runs = state
        .monitor_repo
        .list_runs(id, user.user_id, query.effective_limit())
        .await?
        .ok_or_else(not_owned)?;
    Ok(Json(runs))
}
