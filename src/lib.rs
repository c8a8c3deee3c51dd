pub mod core;
pub mod db;
pub mod errors;
pub mod repositories;
pub mod schemas;

#[cfg(test)]
mod test_support;

use anyhow::Context;

use crate::core::{config::Settings, telemetry};

/// Provisions the configured database: applies migrations and ensures the
/// bootstrap admin exists.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await.context("failed to connect to PostgreSQL")?;
    db::run_migrations(&db_pool).await.context("failed to apply migrations")?;
    tracing::info!("Migrations applied");

    if let Err(err) = core::bootstrap::ensure_superuser(&db_pool, &settings).await {
        tracing::error!(error = %err, "Failed to ensure default superuser");
    }

    tracing::info!(
        environment = %settings.runtime().environment.as_str(),
        "Store schema ready"
    );

    db_pool.close().await;
    Ok(())
}
