//! Catalog retrieval.
//!
//! [`CatalogSource`] is the single seam between the catalog consumers (the
//! HTTP service and the terminal client) and the transport the records come
//! from. A local JSON file and the catalog service itself are the two
//! implementations; [`CachedCatalog`] memoizes either one for a TTL.

pub mod cache;
pub mod file;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{AppConfig, CatalogSourceKind};
use crate::domain::product::{Product, ProductId};
use crate::errors::CatalogError;

pub use cache::{CachedCatalog, Clock, ManualClock, SystemClock};
pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;

/// Ordered product records. Order is display order; names and ids are not
/// checked for uniqueness and lookups return the first match.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parses a JSON array of product records.
    pub fn from_json_slice(bytes: &[u8], location: &str) -> Result<Self, CatalogError> {
        serde_json::from_slice::<Vec<Product>>(bytes).map(Self::new).map_err(|error| {
            CatalogError::Parse { location: location.to_string(), detail: error.to_string() }
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// One name per record, duplicates included.
    pub fn names(&self) -> Vec<&str> {
        self.products.iter().map(|product| product.name.as_str()).collect()
    }

    pub fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.name == name)
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location used in logs and diagnostics.
    fn location(&self) -> String;

    async fn load_all(&self) -> Result<Catalog, CatalogError>;

    async fn get(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let catalog = self.load_all().await?;
        Ok(catalog.find_by_id(id).cloned())
    }
}

/// Builds the source selected by `client.source`.
pub fn source_from_config(config: &AppConfig) -> Result<Arc<dyn CatalogSource>, CatalogError> {
    match config.client.source {
        CatalogSourceKind::File => Ok(Arc::new(FileCatalogSource::new(&config.catalog.path))),
        CatalogSourceKind::Http => Ok(Arc::new(HttpCatalogSource::new(
            &config.client.base_url,
            Duration::from_secs(config.client.timeout_secs),
        )?)),
    }
}
