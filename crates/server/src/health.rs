use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use covercat_core::CatalogSource;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    source: Arc<dyn CatalogSource>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(source: Arc<dyn CatalogSource>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { source })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(state.source.as_ref()).await;
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "covercat-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn catalog_check(source: &dyn CatalogSource) -> HealthCheck {
    match source.load_all().await {
        Ok(catalog) => HealthCheck {
            status: "ready",
            detail: format!("{} products loaded from `{}`", catalog.len(), source.location()),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("catalog load failed: {error}") }
        }
    }
}
