use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    analysis::AnalysisResults,
    auth::dtos::{
        ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
        UserResponse,
    },
    entities::{Monitor, MonitorRun},
    health::HealthResponse,
    monitors::dtos::{
        CreateMonitorRequest, TriggerFailure, TriggerRequest, TriggerResponse,
        UpdateMonitorRequest,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "sdmn", description = "Monitor web sources and analyse their text"),
    paths(
        crate::health::health_check,
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        crate::monitors::handlers::list_monitors,
        crate::monitors::handlers::create_monitor,
        crate::monitors::handlers::get_monitor,
        crate::monitors::handlers::update_monitor,
        crate::monitors::handlers::delete_monitor,
        crate::monitors::handlers::list_runs,
        crate::monitors::trigger::trigger_monitor,
    ),
    components(schemas(
        AnalysisResults,
        CreateMonitorRequest,
        ErrorResponse,
        HealthResponse,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        Monitor,
        MonitorRun,
        RegisterRequest,
        TriggerFailure,
        TriggerRequest,
        TriggerResponse,
        UpdateMonitorRequest,
        UserResponse,
    )),
    modifiers(&SecuritySchemes),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "monitors", description = "Monitor configuration, runs and the scheduler trigger"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "trigger_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-KEY"))),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for route in [
            "/healthz",
            "/auth/register",
            "/auth/login",
            "/auth/logout",
            "/auth/me",
            "/monitors",
            "/monitors/{id}",
            "/monitors/{id}/runs",
            "/monitors/trigger",
        ] {
            assert!(paths.contains_key(route), "missing {route}");
        }
        assert!(doc["components"]["securitySchemes"]["trigger_key"].is_object());
    }
}
