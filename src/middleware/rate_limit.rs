use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};
use tracing::warn;

use crate::error::ApiError;

pub const AUTH_MAX_REQUESTS: u32 = 20;
pub const AUTH_WINDOW_SECONDS: i64 = 60;

/// Fixed-window request counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    max_requests: u32,
    window_seconds: i64,
    // unix seconds of the last expired-window sweep
    last_sweep: Arc<AtomicI64>,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_requests,
            window_seconds,
            last_sweep: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Limit applied to the credential endpoints.
    pub fn for_auth() -> Self {
        Self::new(AUTH_MAX_REQUESTS, AUTH_WINDOW_SECONDS)
    }

    /// Count one request from `key` at `now`; false once the window is used up.
    fn admit(&self, key: String, now: DateTime<Utc>) -> bool {
        // must run before `entry` takes a shard lock
        self.sweep(now);

        let mut entry = self.store.entry(key).or_insert_with(|| RateLimitData {
            count: 0,
            window_start: now,
        });

        let data = entry.value_mut();

        // Check if we need to reset the window
        if now.signed_duration_since(data.window_start) >= Duration::seconds(self.window_seconds) {
            data.count = 0;
            data.window_start = now;
        }

        data.count += 1;
        data.count <= self.max_requests
    }

    /// Drop clients whose window has lapsed, at most once per window length.
    fn sweep(&self, now: DateTime<Utc>) {
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now.timestamp() - last < self.window_seconds {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now.timestamp(), Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return;
        }

        let window = Duration::seconds(self.window_seconds);
        self.store
            .retain(|_, data| now.signed_duration_since(data.window_start) < window);
    }
}

/// IP-based rate limiting middleware.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = addr.ip().to_string();

    if !rate_limit.admit(ip, Utc::now()) {
        warn!(client = %addr.ip(), path = %req.uri().path(), "Rate limit exceeded");
        return Err(ApiError::TooManyRequests);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        extract::connect_info::MockConnectInfo,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    #[test]
    fn test_window_allows_up_to_max() {
        let limit = RateLimit::new(2, 60);
        let now = Utc::now();
        assert!(limit.admit("1.2.3.4".into(), now));
        assert!(limit.admit("1.2.3.4".into(), now));
        assert!(!limit.admit("1.2.3.4".into(), now));
        // other clients have their own window
        assert!(limit.admit("5.6.7.8".into(), now));
    }

    #[test]
    fn test_window_resets() {
        let limit = RateLimit::new(1, 60);
        let start = Utc::now();
        assert!(limit.admit("1.2.3.4".into(), start));
        assert!(!limit.admit("1.2.3.4".into(), start + Duration::seconds(30)));
        assert!(limit.admit("1.2.3.4".into(), start + Duration::seconds(60)));
    }

    #[test]
    fn test_lapsed_clients_are_evicted() {
        let limit = RateLimit::new(5, 60);
        let start = Utc::now();
        assert!(limit.admit("1.1.1.1".into(), start));
        assert!(limit.admit("2.2.2.2".into(), start + Duration::seconds(30)));
        assert_eq!(limit.store.len(), 2);

        // 1.1.1.1's window is over, 2.2.2.2's is not
        assert!(limit.admit("3.3.3.3".into(), start + Duration::seconds(70)));
        assert!(!limit.store.contains_key("1.1.1.1"));
        assert!(limit.store.contains_key("2.2.2.2"));
        assert!(limit.store.contains_key("3.3.3.3"));
    }

    #[tokio::test]
    async fn test_middleware_returns_429() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn_with_state(RateLimit::new(1, 60), rate_limit_middleware))
            .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));

        let first = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
