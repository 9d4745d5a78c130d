//! Shared application state handed to every handler

use crate::{
    config::Config,
    db::{PostgresProductStore, ProductStore},
    search::SearchBackends,
    services::{CatalogSearchService, ImportService, IndexProvisioner},
    startup, Result,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backends: SearchBackends,
    pub provisioner: Arc<IndexProvisioner>,
    pub catalog_search: Arc<CatalogSearchService>,
    pub import_service: Arc<ImportService>,
}

impl AppState {
    /// Connect to PostgreSQL, apply migrations and configure both search backends.
    pub async fn new(config: Config) -> Result<Self> {
        let pool = startup::connect_pool(&config.database).await?;
        if config.database.run_migrations {
            startup::run_migrations(&pool).await?;
        }
        let backends = startup::build_backends(&config.search)?;

        Ok(Self::from_parts(
            config,
            Arc::new(PostgresProductStore::new(pool)),
            backends,
        ))
    }

    /// Assemble state around an existing store and backends.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn ProductStore>,
        backends: SearchBackends,
    ) -> Self {
        let provisioner = Arc::new(IndexProvisioner::new(store.clone()));
        let catalog_search = Arc::new(CatalogSearchService::new(
            provisioner.clone(),
            config.search.max_page_size,
        ));
        let import_service = Arc::new(ImportService::new(store));

        Self {
            config: Arc::new(config),
            backends,
            provisioner,
            catalog_search,
            import_service,
        }
    }
}
