use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::{Catalog, CatalogSource};
use crate::domain::product::{Product, ProductId};
use crate::errors::CatalogError;

/// Reads the catalog from a running catalog service.
#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let invalid = |detail: String| CatalogError::InvalidBaseUrl {
            url: base_url.to_string(),
            detail,
        };

        let base_url = Url::parse(base_url).map_err(|error| invalid(error.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("url cannot carry a path".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| invalid(format!("http client could not be built: {error}")))?;

        Ok(Self { client, base_url, timeout })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch(&self, url: &Url) -> Result<(StatusCode, Vec<u8>), CatalogError> {
        let response =
            self.client.get(url.clone()).send().await.map_err(|error| self.map_error(url, error))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|error| self.map_error(url, error))?;
        Ok((status, body.to_vec()))
    }

    fn map_error(&self, url: &Url, error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            CatalogError::Timeout { url: url.to_string(), timeout_secs: self.timeout.as_secs() }
        } else {
            CatalogError::Transport { url: url.to_string(), detail: error.to_string() }
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn location(&self) -> String {
        self.base_url.to_string()
    }

    async fn load_all(&self) -> Result<Catalog, CatalogError> {
        let url = self.endpoint(&["products"]);
        let (status, body) = self.fetch(&url).await?;
        if !status.is_success() {
            return Err(CatalogError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let catalog = Catalog::from_json_slice(&body, url.as_str())?;
        debug!(
            event_name = "catalog.http.loaded",
            url = %url,
            product_count = catalog.len(),
            "catalog fetched from service"
        );
        Ok(catalog)
    }

    async fn get(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let url = self.endpoint(&["products", id.as_str()]);
        let (status, body) = self.fetch(&url).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status { url: url.to_string(), status: status.as_u16() });
        }

        serde_json::from_slice::<Product>(&body).map(Some).map_err(|error| CatalogError::Parse {
            location: url.to_string(),
            detail: error.to_string(),
        })
    }
}
