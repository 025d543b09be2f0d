use covercat_core::config::AppConfig;
use covercat_core::{ClientError, ProductId, SessionError};
use serde::Serialize;

use super::{CatalogRuntime, CommandResult, EXIT_OK};

#[derive(Debug, Serialize)]
struct ProductSummary<'a> {
    id: &'a ProductId,
    name: &'a str,
}

pub fn run(config: &AppConfig, json: bool) -> CommandResult {
    let catalog = match CatalogRuntime::from_config(config).and_then(|runtime| runtime.snapshot())
    {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::client_failure("products", &error.into(), json),
    };

    if catalog.is_empty() {
        let error = ClientError::Session(SessionError::EmptyCatalog);
        return CommandResult::client_failure("products", &error, json);
    }

    let summaries: Vec<ProductSummary<'_>> = catalog
        .products()
        .iter()
        .map(|product| ProductSummary { id: &product.id, name: &product.name })
        .collect();

    if json {
        return CommandResult::text(
            EXIT_OK,
            serde_json::to_string_pretty(&summaries).unwrap_or_else(|error| {
                format!("{{\"error\":\"product list serialization failed: {error}\"}}")
            }),
        );
    }

    let lines: Vec<String> =
        summaries.iter().map(|summary| format!("{}\t{}", summary.id, summary.name)).collect();
    CommandResult::text(EXIT_OK, lines.join("\n"))
}
