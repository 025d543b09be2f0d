use std::sync::Arc;

use covercat_core::config::{AppConfig, ConfigError, LoadOptions};
use covercat_core::{CatalogSource, FileCatalogSource};
use thiserror::Error;
use tracing::{info, warn};

pub struct Application {
    pub config: AppConfig,
    pub source: Arc<dyn CatalogSource>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config).await)
}

/// Wires the service to the catalog file named in `catalog.path`.
///
/// The file is read once here as a preflight. A failure is logged but does not
/// stop startup: data routes report it per request and `/health` reports it as
/// degraded until the file becomes readable.
pub async fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        catalog_path = %config.catalog.path.display(),
        "starting application bootstrap"
    );

    let source: Arc<dyn CatalogSource> = Arc::new(FileCatalogSource::new(&config.catalog.path));

    match source.load_all().await {
        Ok(catalog) => info!(
            event_name = "system.bootstrap.catalog_loaded",
            correlation_id = "bootstrap",
            product_count = catalog.len(),
            "catalog preflight succeeded"
        ),
        Err(error) => warn!(
            event_name = "system.bootstrap.catalog_unavailable",
            correlation_id = "bootstrap",
            error_class = error.class(),
            error = %error,
            "catalog preflight failed; serving degraded until the file is readable"
        ),
    }

    Application { config, source }
}
