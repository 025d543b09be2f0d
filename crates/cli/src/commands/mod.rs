pub mod ask;
pub mod browse;
pub mod config;
pub mod products;

use std::sync::Arc;
use std::time::Duration;

use covercat_core::config::AppConfig;
use covercat_core::{
    source_from_config, CachedCatalog, Catalog, CatalogError, CatalogSource, ClientError, Clock,
    SessionError, SystemClock,
};
use serde::Serialize;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_LOAD_FAILURE: u8 = 3;
pub const EXIT_EMPTY_CATALOG: u8 = 4;
pub const EXIT_USAGE: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn text(exit_code: u8, output: impl Into<String>) -> Self {
        Self { exit_code, output: output.into() }
    }

    pub fn client_failure(command: &str, error: &ClientError, json: bool) -> Self {
        let exit_code = exit_code_for(error);
        if json {
            Self::failure(command, error.class(), error.user_message(), exit_code)
        } else {
            Self::text(exit_code, error.user_message())
        }
    }
}

pub fn exit_code_for(error: &ClientError) -> u8 {
    match error {
        ClientError::Load(_) => EXIT_LOAD_FAILURE,
        ClientError::Session(SessionError::EmptyCatalog) => EXIT_EMPTY_CATALOG,
        ClientError::Session(_) => EXIT_USAGE,
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Blocking handle over the configured catalog source and its TTL cache.
pub struct CatalogRuntime {
    runtime: tokio::runtime::Runtime,
    cache: CachedCatalog,
}

impl CatalogRuntime {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> std::io::Result<Self> {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn CatalogSource>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, cache: CachedCatalog::with_clock(source, ttl, clock) })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let source = source_from_config(config)?;
        Self::new(source, Duration::from_secs(config.client.cache_ttl_secs)).map_err(|error| {
            CatalogError::Read {
                location: "async runtime".to_string(),
                detail: format!("failed to initialize async runtime: {error}"),
            }
        })
    }

    pub fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.runtime.block_on(self.cache.snapshot())
    }
}
