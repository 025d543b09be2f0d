//! Catalog read API.
//!
//! - `GET /products`                      full catalog, stored order
//! - `GET /products/{id}`                 one product by exact id, or 404
//! - `GET /young-driver-products[/{id}]`  same handlers under the legacy paths

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use covercat_core::{Catalog, CatalogError, CatalogSource, Product, ProductId};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Clone)]
pub struct CatalogState {
    source: Arc<dyn CatalogSource>,
}

impl CatalogState {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Product not found")]
    ProductNotFound { id: ProductId },
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            Self::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

pub fn router(source: Arc<dyn CatalogSource>) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/young-driver-products", get(list_products))
        .route("/young-driver-products/{id}", get(get_product))
        .with_state(CatalogState::new(source))
}

pub async fn list_products(State(state): State<CatalogState>) -> Result<Json<Catalog>, ApiError> {
    let catalog = state.source.load_all().await.map_err(|error| {
        warn!(
            event_name = "api.products.load_failed",
            location = %state.source.location(),
            error_class = error.class(),
            error = %error,
            "catalog could not be loaded"
        );
        ApiError::from(error)
    })?;

    info!(
        event_name = "api.products.listed",
        product_count = catalog.len(),
        "catalog listed"
    );
    Ok(Json(catalog))
}

pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<CatalogState>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId(id);
    let found = state.source.get(&id).await.map_err(|error| {
        warn!(
            event_name = "api.product.load_failed",
            product_id = %id,
            error_class = error.class(),
            error = %error,
            "catalog could not be loaded"
        );
        ApiError::from(error)
    })?;

    match found {
        Some(product) => {
            info!(event_name = "api.product.found", product_id = %id, "product returned");
            Ok(Json(product))
        }
        None => {
            info!(event_name = "api.product.not_found", product_id = %id, "product not found");
            Err(ApiError::ProductNotFound { id })
        }
    }
}
