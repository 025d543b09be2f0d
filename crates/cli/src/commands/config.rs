use covercat_core::config::AppConfig;

use super::{CommandResult, EXIT_OK};

pub fn run(config: &AppConfig, json: bool) -> CommandResult {
    if json {
        return CommandResult::text(
            EXIT_OK,
            serde_json::to_string_pretty(config).unwrap_or_else(|error| {
                format!("{{\"error\":\"config serialization failed: {error}\"}}")
            }),
        );
    }

    let lines = [
        "effective config (precedence: flags > env > file > default):".to_string(),
        render_line("catalog.path", &config.catalog.path.display().to_string()),
        render_line("server.bind_address", &config.server.bind_address),
        render_line("server.port", &config.server.port.to_string()),
        render_line("client.source", &format!("{:?}", config.client.source).to_ascii_lowercase()),
        render_line("client.base_url", &config.client.base_url),
        render_line("client.timeout_secs", &config.client.timeout_secs.to_string()),
        render_line("client.cache_ttl_secs", &config.client.cache_ttl_secs.to_string()),
        render_line("logging.level", &config.logging.level),
        render_line("logging.format", &format!("{:?}", config.logging.format).to_ascii_lowercase()),
    ];

    CommandResult::text(EXIT_OK, lines.join("\n"))
}

fn render_line(key: &str, value: &str) -> String {
    format!("- {key} = {value}")
}
