use crate::config::get_config;
use crate::error::Result;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::time::Duration;
use tracing::{info, warn};

pub async fn create_pool() -> Result<PgPool> {
    let config = get_config();
    connect(
        &config.database_url,
        config.database_max_connections,
        config.database_acquire_timeout,
    )
    .await
}

pub async fn connect(url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<PgPool> {
    let options: PgConnectOptions = url.parse()?;
    info!(
        host = options.get_host(),
        database = options.get_database().unwrap_or_default(),
        "connecting to postgres"
    );

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Closes the pool, giving up on stragglers once `timeout` elapses.
pub async fn close_pool(pool: &PgPool, timeout: Duration) {
    if tokio::time::timeout(timeout, pool.close()).await.is_err() {
        warn!(?timeout, "timed out waiting for postgres connections to close");
    }
}
