mod helpers;

use axum::http::{StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use helpers::{authed, json_body, json_request, test_app, test_pool, unique};
use sdmn::auth::middleware::SESSION_COOKIE;

#[tokio::test]
async fn test_register_success() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool);

    let username = unique("alice");
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "CorrectHorseBatteryStaple123"
    });

    let response = app
        .oneshot(json_request("POST", "/auth/register", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["username"], username);
    assert!(body.get("pw_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool);

    let username = unique("bob");
    let first = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "CorrectHorseBatteryStaple123"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/register", &first))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // same username, different email
    let second = json!({
        "username": username,
        "email": format!("other_{username}@example.com"),
        "password": "CorrectHorseBatteryStaple123"
    });
    let response = app
        .oneshot(json_request("POST", "/auth/register", &second))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        json_body(response).await["error"],
        "Username or email already registered"
    );
}

#[tokio::test]
async fn test_login_then_me_with_bearer_and_cookie() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool);

    let username = unique("carol");
    let register = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "CorrectHorseBatteryStaple123"
    });
    app.clone()
        .oneshot(json_request("POST", "/auth/register", &register))
        .await
        .unwrap();

    let login = json!({
        "username": username,
        "password": "CorrectHorseBatteryStaple123",
        "remember": true
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/login", &login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(cookie.contains("Max-Age=86400"));

    let token = json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(authed("GET", "/auth/me", &token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["username"], username);

    let pair = cookie.split(';').next().unwrap().to_string();
    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, pair)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool);

    let username = unique("dave");
    let register = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "CorrectHorseBatteryStaple123"
    });
    app.clone()
        .oneshot(json_request("POST", "/auth/register", &register))
        .await
        .unwrap();

    let wrong_password = json!({ "username": username, "password": "WrongPassword123" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/login", &wrong_password))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Invalid credentials");

    let unknown_user = json!({ "username": unique("ghost"), "password": "whatever123" });
    let response = app
        .oneshot(json_request("POST", "/auth/login", &unknown_user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Invalid credentials");
}
