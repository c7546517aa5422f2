use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;

use crate::{
    app_state::AppState,
    auth::{api_key::require_trigger_key, handlers as auth},
    health::health_check,
    middleware::{RateLimit, rate_limit_middleware},
    monitors,
    openapi::openapi_json,
};

/// The full HTTP surface.
///
/// Credential endpoints are rate limited per client IP, which needs the
/// server to be started with connect info. The trigger route sits behind the
/// shared-secret check, applied as a route layer so it runs before the body
/// is parsed.
pub fn app(state: AppState) -> Router {
    let credentials = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route_layer(from_fn_with_state(
            RateLimit::for_auth(),
            rate_limit_middleware,
        ));

    let trigger = Router::new()
        .route("/monitors/trigger", post(monitors::trigger_monitor))
        .route_layer(from_fn_with_state(state.clone(), require_trigger_key));

    Router::new()
        .route("/healthz", get(health_check))
        .route("/openapi.json", get(openapi_json))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/monitors",
            get(monitors::list_monitors).post(monitors::create_monitor),
        )
        .route(
            "/monitors/{id}",
            get(monitors::get_monitor)
                .put(monitors::update_monitor)
                .delete(monitors::delete_monitor),
        )
        .route("/monitors/{id}/runs", get(monitors::list_runs))
        .merge(credentials)
        .merge(trigger)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-");
                        info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_body, test_state};
    use axum::{
        extract::connect_info::MockConnectInfo,
        http::StatusCode,
    };
    use serde_json::json;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let response = app(test_state().build())
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_propagated() {
        let response = app(test_state().build())
            .oneshot(
                Request::get("/openapi.json")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let app = app(test_state().build())
            .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 7], 5000))));

        // invalid bodies never reach the repository but still count
        for _ in 0..crate::middleware::rate_limit::AUTH_MAX_REQUESTS {
            let response = app
                .clone()
                .oneshot(
                    Request::post("/auth/login")
                        .header("content-type", "application/json")
                        .body(Body::from(json!({"username": ""}).to_string()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app
            .oneshot(
                Request::post("/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"username": ""}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json_body(response).await["error"], "Rate limit exceeded");
    }

    #[tokio::test]
    async fn test_monitor_routes_require_session() {
        for (method, uri) in [
            ("GET", "/monitors"),
            ("POST", "/monitors"),
            ("GET", "/monitors/1"),
            ("PUT", "/monitors/1"),
            ("DELETE", "/monitors/1"),
            ("GET", "/monitors/1/runs"),
            ("GET", "/auth/me"),
        ] {
            let response = app(test_state().build())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }
}
