use anyhow::Context;
use sdmn::{app_state::AppState, config::Config, routes, telemetry};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    telemetry::init(config.log_format());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    // runs all pending migrations; no-op if up-to-date
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    if config.trigger_api_key().is_none() {
        tracing::warn!("TRIGGER_API_KEY is not set; every trigger request will be rejected");
    }

    let bind_addr = config.bind_addr().to_string();
    let state = AppState::new(pool, config)?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
