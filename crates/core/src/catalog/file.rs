use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{Catalog, CatalogSource};
use crate::errors::CatalogError;

/// Reads the catalog from a JSON file on every load.
#[derive(Clone, Debug)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn load_all(&self) -> Result<Catalog, CatalogError> {
        let location = self.location();
        let bytes = tokio::fs::read(&self.path).await.map_err(|error| match error.kind() {
            ErrorKind::NotFound => CatalogError::NotFound { location: location.clone() },
            _ => CatalogError::Read { location: location.clone(), detail: error.to_string() },
        })?;

        let catalog = Catalog::from_json_slice(&bytes, &location)?;
        debug!(
            event_name = "catalog.file.loaded",
            location = %location,
            product_count = catalog.len(),
            "catalog file loaded"
        );
        Ok(catalog)
    }
}
