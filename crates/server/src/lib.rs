pub mod api;
pub mod bootstrap;
pub mod health;

use std::sync::Arc;

use axum::Router;
use covercat_core::CatalogSource;
use tower_http::cors::{Any, CorsLayer};

/// Full service router: catalog API, health, and an allow-all CORS policy.
pub fn app(source: Arc<dyn CatalogSource>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .merge(api::router(Arc::clone(&source)))
        .merge(health::router(source))
        .layer(cors)
}
