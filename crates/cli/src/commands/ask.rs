use covercat_core::config::AppConfig;
use covercat_core::{ClientError, FaqCategory, RenderedAnswer, Session};

use super::{CatalogRuntime, CommandResult, EXIT_OK};

/// Select `product`, choose `question`, and confirm in one step.
pub fn run(config: &AppConfig, product: &str, question: &str, json: bool) -> CommandResult {
    match resolve(config, product, question) {
        Ok(answer) if json => CommandResult::text(
            EXIT_OK,
            serde_json::to_string_pretty(&answer).unwrap_or_else(|_| answer.to_text()),
        ),
        Ok(answer) => CommandResult::text(EXIT_OK, answer.to_text()),
        Err(error) => CommandResult::client_failure("ask", &error, json),
    }
}

fn resolve(config: &AppConfig, product: &str, question: &str) -> Result<RenderedAnswer, ClientError> {
    let category = question.parse::<FaqCategory>()?;
    let catalog = CatalogRuntime::from_config(config)?;

    let mut session = Session::start(catalog.snapshot()?)?;
    session.select_product(product)?;
    session.choose_category(category)?;
    Ok(session.confirm()?)
}
