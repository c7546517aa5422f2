use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    auth::dtos::ErrorResponse,
    entities::NewMonitorRun,
    error::ApiError,
    monitors::dtos::{TriggerFailure, TriggerRequest, TriggerResponse},
    processor::ProcessError,
};

#[derive(Debug)]
pub enum TriggerError {
    Api(ApiError),
    Processing {
        monitor_id: i64,
        source: ProcessError,
    },
}

impl From<ApiError> for TriggerError {
    fn from(err: ApiError) -> Self {
        TriggerError::Api(err)
    }
}

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        match self {
            TriggerError::Api(err) => err.into_response(),
            TriggerError::Processing { monitor_id, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TriggerFailure {
                    error: format!(
                        "Failed to process data for monitor {monitor_id} or no data available for analysis."
                    ),
                    reason: source.reason().to_string(),
                    retriable: source.is_retriable(),
                }),
            )
                .into_response(),
        }
    }
}

/// Run one monitor now. Called by the external scheduler, so there is no
/// ownership check; the API-key layer in front of this route is the only
/// guard.
#[utoipa::path(
    post,
    path = "/monitors/trigger",
    tag = "monitors",
    request_body = TriggerRequest,
    params(("X-API-KEY" = String, Header, description = "Shared trigger secret")),
    responses(
        (status = 200, description = "Processed; results stored as a run", body = TriggerResponse),
        (status = 400, description = "Missing or malformed monitor_id", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 404, description = "Unknown monitor", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = TriggerFailure)
    )
)]
pub async fn trigger_monitor(
    State(state): State<AppState>,
    payload: Result<Json<TriggerRequest>, JsonRejection>,
) -> Result<Json<TriggerResponse>, TriggerError> {
    let Json(TriggerRequest { monitor_id }) = payload.map_err(ApiError::from)?;

    let monitor = state
        .monitor_repo
        .get_by_id(monitor_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Monitor with ID {monitor_id} not found")))?;

    if !monitor.is_active {
        warn!(monitor_id, "Triggered monitor is inactive, processing anyway");
    }

    let ran_at = Utc::now();
    let outcome = state
        .processor
        .process(&monitor)
        .await
        .map_err(|source| TriggerError::Processing { monitor_id, source })?;

    let results =
        serde_json::to_value(&outcome.results).map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .monitor_repo
        .record_run(
            monitor_id,
            &NewMonitorRun {
                ran_at,
                results,
                lang: outcome.lang,
                content_checksum: outcome.content_checksum,
            },
        )
        .await
        .map_err(ApiError::from)?;

    info!(monitor_id, analysis_type = %monitor.analysis_type, "Monitor run recorded");

    Ok(Json(TriggerResponse {
        message: format!("Processing triggered successfully for monitor {monitor_id}"),
        monitor_id,
        ran_at,
        analysis_results: outcome.results,
    }))
}
