//! Construction of external resources at process start

use crate::{
    config::{DatabaseConfig, SearchConfig},
    search::{MeilisearchBackend, SearchBackends, TypesenseBackend},
    Result,
};
use catalog_search_client::{MeilisearchClient, TypesenseClient};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut options = PgConnectOptions::from_str(&config.url)?;
    if config.statement_timeout_seconds > 0 {
        options = options.options([(
            "statement_timeout",
            format!("{}s", config.statement_timeout_seconds),
        )]);
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = config.pool_max_size,
        "Database pool established"
    );
    Ok(pool)
}

/// Create the `product` table and its indexes if they are missing.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Clients are built eagerly, but nothing is sent to an engine until the
/// first search needs it.
pub fn build_backends(config: &SearchConfig) -> Result<SearchBackends> {
    let task_timeout = Duration::from_secs(config.task_timeout_seconds);
    let ingest_timeout = Duration::from_secs(config.ingest_timeout_seconds);

    let meili_client =
        MeilisearchClient::new(&config.meilisearch.url, config.meilisearch.api_key.clone())?
            .with_poll_interval(Duration::from_millis(config.task_poll_interval_ms));
    let typesense_client =
        TypesenseClient::new(&config.typesense.url, &config.typesense.api_key)?;

    tracing::info!(
        meilisearch = %config.meilisearch.url,
        typesense = %config.typesense.url,
        default_backend = %config.default_backend,
        "Search backends configured"
    );

    Ok(SearchBackends::new(
        Arc::new(MeilisearchBackend::new(
            meili_client,
            task_timeout,
            ingest_timeout,
        )),
        Arc::new(TypesenseBackend::new(typesense_client, ingest_timeout)),
        config.default_backend,
    ))
}
