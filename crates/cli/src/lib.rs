pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use covercat_core::config::{AppConfig, CatalogSourceKind, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "covercat",
    about = "Young driver product FAQ browser",
    long_about = "Browse young driver insurance products and read answers to common questions, \
                  from a local catalog file or a running catalog service.",
    after_help = "Examples:\n  covercat browse\n  covercat products --json\n  covercat ask --product \"Starter Cover\" --question policy_benefits\n  covercat --source http --base-url http://127.0.0.1:8000 browse"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a covercat.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_enum, help = "Where to read the catalog from")]
    source: Option<SourceArg>,
    #[arg(long, global = true, help = "Catalog JSON file for the file source")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog service base URL for the http source")]
    base_url: Option<String>,
    #[arg(short, long, global = true, help = "Log at the configured level instead of warn")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    File,
    Http,
}

impl From<SourceArg> for CatalogSourceKind {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::File => Self::File,
            SourceArg::Http => Self::Http,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Pick a product and a question interactively and read the answer")]
    Browse,
    #[command(about = "List catalog products")]
    Products {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Show the answer to one question about one product")]
    Ask {
        #[arg(long, help = "Product name exactly as listed")]
        product: String,
        #[arg(long, help = "Question label or key, e.g. `claims_process`")]
        question: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values")]
    Config {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_path: self.catalog.clone(),
                source: self.source.map(CatalogSourceKind::from),
                base_url: self.base_url.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

fn init_logging(config: &AppConfig, verbose: bool) {
    use covercat_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = if verbose {
        config.logging.level.parse::<Level>().unwrap_or(Level::INFO)
    } else {
        Level::WARN
    };

    // stdout carries menus and command output; logs go to stderr.
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);
    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.load_options()) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::failure(
                "config",
                "config_validation",
                error.to_string(),
                commands::EXIT_CONFIG,
            );
            eprintln!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config, cli.verbose);

    let result = match &cli.command {
        Command::Browse => commands::browse::run(&config),
        Command::Products { json } => commands::products::run(&config, *json),
        Command::Ask { product, question, json } => {
            commands::ask::run(&config, product, question, *json)
        }
        Command::Config { json } => commands::config::run(&config, *json),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
