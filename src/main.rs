use anyhow::Context;
use dotenvy::dotenv;
use registrar::router::init_router;
use registrar::state::init_app_state;
use registrar_config::{AdmissionConfig, DatabaseConfig, ServerConfig};
use registrar_db::{init_db_pool, run_migrations};
use registrar_observability::{init_metrics, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guard = init_tracing();
    let metrics = init_metrics().context("Failed to install Prometheus recorder")?;

    let database_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let state = init_app_state(pool, AdmissionConfig::from_env(), metrics);
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
