#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response, header},
};
use sdmn::{app_state::AppState, config::Config, routes};
use serde_json::Value;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::{
    net::SocketAddr,
    time::{SystemTime, UNIX_EPOCH},
};

pub const TRIGGER_KEY: &str = "integration-key";

/// Connects to `TEST_DATABASE_URL` and applies migrations, or returns `None`
/// so the calling test can skip.
pub async fn test_pool() -> Option<Pool<Postgres>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("Skipping database tests: TEST_DATABASE_URL not set");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

pub fn test_app(pool: Pool<Postgres>) -> Router {
    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_default();
    let config = Config::new(url, "127.0.0.1:0", "integration-secret")
        .with_trigger_api_key(TRIGGER_KEY);
    let state = AppState::new(pool, config).expect("state builds");

    routes::app(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
}

/// Name that will not collide with rows left by earlier runs.
pub fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    format!("{prefix}_{}_{nanos}", std::process::id())
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, token: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Registers a fresh user and returns their session token.
pub async fn register_and_login(app: &Router) -> String {
    use tower::ServiceExt;

    let username = unique("user");
    let register = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "password123",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/register", &register))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let login = serde_json::json!({ "username": username, "password": "password123" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/login", &login))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    json_body(response).await["token"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}
