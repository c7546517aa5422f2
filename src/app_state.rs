use crate::{
    analysis::Analyzers,
    auth::jwt::JwtService,
    config::Config,
    fetcher::{Fetcher, HttpFetcher},
    passwords::Passwords,
    processor::MonitorProcessor,
    repositories::{MonitorRepository, MonitorRepositoryTrait, UserRepository, UserRepositoryTrait},
};
use anyhow::Result;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_repo: Arc<dyn UserRepositoryTrait>,
    pub monitor_repo: Arc<dyn MonitorRepositoryTrait>,
    pub processor: Arc<MonitorProcessor>,
    pub jwt: Arc<JwtService>,
    pub passwords: Passwords,
    pub db_pool: Pool<Postgres>,
}

impl AppState {
    /// Wire the production collaborators. Analyzers and the HTTP client are
    /// built here once and shared read-only by every request.
    pub fn new(pool: Pool<Postgres>, config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.fetch())?);
        let analyzers = Arc::new(Analyzers::from_config(&config));
        let processor = Arc::new(MonitorProcessor::new(fetcher, analyzers));

        Ok(Self {
            jwt: Arc::new(JwtService::new(config.jwt_secret())),
            passwords: Passwords::standard()?,
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            monitor_repo: Arc::new(MonitorRepository::new(pool.clone())),
            processor,
            config: Arc::new(config),
            db_pool: pool,
        })
    }
}
