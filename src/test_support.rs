//! Shared fixtures for handler tests: an `AppState` wired to mocks.

use axum::{body::to_bytes, response::Response};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::{
    analysis::{Analyzers, KeywordExtractor, Stopwords, VaderScorer},
    app_state::AppState,
    auth::jwt::JwtService,
    config::Config,
    fetcher::{Fetcher, MockFetcher},
    passwords::Passwords,
    processor::MonitorProcessor,
    repositories::{MockMonitorRepositoryTrait, MockUserRepositoryTrait},
};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_TRIGGER_KEY: &str = "test-trigger-key";

pub fn test_config() -> Config {
    Config::new("postgres://localhost/unused", "127.0.0.1:0", TEST_JWT_SECRET)
        .with_trigger_api_key(TEST_TRIGGER_KEY)
}

/// Argon2 with minimal cost so tests stay fast.
pub fn cheap_passwords() -> Passwords {
    Passwords::new(1024, 1, 1).expect("valid argon2 params")
}

/// `Authorization` header value for a session of `user_id`.
pub fn bearer(user_id: i64) -> String {
    let token = JwtService::new(TEST_JWT_SECRET)
        .generate_token(user_id)
        .expect("Failed to generate token");
    format!("Bearer {token}")
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub struct TestState {
    config: Config,
    user_repo: MockUserRepositoryTrait,
    monitor_repo: MockMonitorRepositoryTrait,
    fetcher: Arc<dyn Fetcher>,
    analyzers: Analyzers,
}

/// Mocks without expectations: any unexpected repository or fetch call
/// panics the test.
pub fn test_state() -> TestState {
    TestState {
        config: test_config(),
        user_repo: MockUserRepositoryTrait::new(),
        monitor_repo: MockMonitorRepositoryTrait::new(),
        fetcher: Arc::new(MockFetcher::new()),
        analyzers: Analyzers::new(
            Box::new(VaderScorer::new()),
            KeywordExtractor::new(Stopwords::english(), 10),
        ),
    }
}

impl TestState {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn user_repo(mut self, repo: MockUserRepositoryTrait) -> Self {
        self.user_repo = repo;
        self
    }

    pub fn monitor_repo(mut self, repo: MockMonitorRepositoryTrait) -> Self {
        self.monitor_repo = repo;
        self
    }

    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    /// Must run inside a Tokio runtime (the lazy pool spawns its reaper).
    pub fn build(self) -> AppState {
        let db_pool = PgPoolOptions::new()
            .connect_lazy(self.config.database_url())
            .expect("Failed to create lazy test pool");

        AppState {
            jwt: Arc::new(JwtService::new(self.config.jwt_secret())),
            passwords: cheap_passwords(),
            user_repo: Arc::new(self.user_repo),
            monitor_repo: Arc::new(self.monitor_repo),
            processor: Arc::new(MonitorProcessor::new(
                self.fetcher,
                Arc::new(self.analyzers),
            )),
            config: Arc::new(self.config),
            db_pool,
        }
    }
}
