use std::collections::VecDeque;
use std::env;
use std::fs;
use std::io::{self, BufRead, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use covercat_cli::commands::{ask, browse, products, CatalogRuntime};
use covercat_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use covercat_core::{Clock, FileCatalogSource, ManualClock, SystemClock};
use serde_json::Value;
use tempfile::TempDir;

const EXAMPLE_CATALOG: &str = r#"[
    {"id": "yd1", "name": "Starter Cover",
     "faqs": {"policy_benefits": "Covers basics.", "add_ons": ""}},
    {"id": "yd2", "name": "Night Owl",
     "faqs": {"claims_process": "Call the night line on 0800 000 000."}}
]"#;

const DISCLAIMER: &str = "This information is a guide only and does not form part of your \
                          policy terms. Please refer to your policy documents for full details.";
const FALLBACK: &str = "Sorry, we don't have information for this yet.";

#[test]
fn browse_shows_stored_answer_with_disclaimer() {
    let output = browse_with(Some(EXAMPLE_CATALOG), "1\n1\n\nq\n");

    assert_eq!(output.0, 0);
    assert!(output.1.contains("Which young driver product would you like to know more about?"));
    assert!(output.1.contains("  1. Starter Cover\n  2. Night Owl"));
    assert!(output.1.contains("Great, let's look at Starter Cover"));
    assert!(output.1.contains(&format!("Policy benefits\n\nCovers basics.\n\n{DISCLAIMER}")));
}

#[test]
fn browse_falls_back_for_empty_and_absent_answers() {
    let output = browse_with(Some(EXAMPLE_CATALOG), "1\n4\n\n3\n\nq\n");

    assert_eq!(output.0, 0);
    assert!(output.1.contains(&format!("What add-ons are available\n\n{FALLBACK}\n\n{DISCLAIMER}")));
    assert!(output.1.contains(&format!("How to make a claim\n\n{FALLBACK}\n\n{DISCLAIMER}")));
}

#[test]
fn browse_can_switch_products_and_keeps_pending_question() {
    let output = browse_with(Some(EXAMPLE_CATALOG), "1\n3\n\np\n2\n\n\nq\n");

    assert_eq!(output.0, 0);
    assert!(output.1.contains("Great, let's look at Night Owl"));
    assert!(output.1.contains("Call the night line on 0800 000 000."));
    assert!(output.1.contains("Enter for 3"), "default should follow the pending question");
}

#[test]
fn browse_prompts_again_on_blank_or_invalid_product_choice() {
    let output = browse_with(Some(EXAMPLE_CATALOG), "\n7\nq\n");

    assert_eq!(output.0, 0);
    assert!(output.1.contains("Select a product above to continue."));
    assert!(output.1.contains("Please choose a number between 1 and 2."));
    assert!(!output.1.contains("Great, let's look at"));
}

#[test]
fn browse_going_back_does_not_show_an_answer() {
    let output = browse_with(Some(EXAMPLE_CATALOG), "1\n1\nb\nq\n");

    assert_eq!(output.0, 0);
    assert!(!output.1.contains(DISCLAIMER));
}

#[test]
fn browse_halts_before_selector_on_empty_catalog() {
    let output = browse_with(Some("[]"), "1\n");

    assert_eq!(output.0, 4);
    assert_eq!(output.1.trim(), "No young driver products are available at the moment.");
}

#[test]
fn browse_halts_with_cause_on_malformed_catalog() {
    let output = browse_with(Some("{\"broken\": "), "1\n");

    assert_eq!(output.0, 3);
    assert!(output.1.starts_with("Sorry, we can't load product information right now: "));
    assert!(output.1.contains("not a well-formed product list"));
    assert!(!output.1.contains("Which young driver product"));
}

#[test]
fn browse_halts_with_cause_on_missing_catalog() {
    let output = browse_with(None, "1\n");

    assert_eq!(output.0, 3);
    assert!(output.1.contains("was not found"));
}

#[test]
fn browse_picks_up_rewritten_catalog_once_ttl_expires() {
    let output = browse_across_rewrite(Duration::from_secs(61));

    assert!(output.contains("  1. Learner Cover\n"));
    assert!(output.contains("Great, let's look at Learner Cover"));
    assert_eq!(output.matches("  2. Night Owl").count(), 1, "old menu must not be shown again");
}

#[test]
fn browse_keeps_cached_catalog_within_ttl() {
    let output = browse_across_rewrite(Duration::from_secs(30));

    assert!(!output.contains("Learner Cover"));
    assert_eq!(output.matches("  2. Night Owl").count(), 2);
    assert_eq!(output.matches("Great, let's look at Starter Cover").count(), 2);
}

#[test]
fn ask_resolves_label_or_key() {
    with_catalog(Some(EXAMPLE_CATALOG), |config| {
        let by_label = ask::run(config, "Starter Cover", "Policy benefits", false);
        assert_eq!(by_label.exit_code, 0);
        assert_eq!(by_label.output, format!("Policy benefits\n\nCovers basics.\n\n{DISCLAIMER}"));

        let by_key = ask::run(config, "Starter Cover", "claims_process", true);
        assert_eq!(by_key.exit_code, 0);
        let payload = parse_payload(&by_key.output);
        assert_eq!(payload["heading"], "How to make a claim");
        assert_eq!(payload["body"], FALLBACK);
        assert_eq!(payload["answered"], false);
        assert_eq!(payload["product_id"], "yd1");
    });
}

#[test]
fn ask_reports_unknown_product_and_category() {
    with_catalog(Some(EXAMPLE_CATALOG), |config| {
        let unknown_product = ask::run(config, "Ghost Cover", "add_ons", true);
        assert_eq!(unknown_product.exit_code, 5);
        let payload = parse_payload(&unknown_product.output);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unknown_product");

        let unknown_category = ask::run(config, "Starter Cover", "excess", true);
        assert_eq!(unknown_category.exit_code, 5);
        assert_eq!(parse_payload(&unknown_category.output)["error_class"], "unknown_category");
    });
}

#[test]
fn products_lists_ids_and_names_in_order() {
    with_catalog(Some(EXAMPLE_CATALOG), |config| {
        let text = products::run(config, false);
        assert_eq!(text.exit_code, 0);
        assert_eq!(text.output, "yd1\tStarter Cover\nyd2\tNight Owl");

        let json = products::run(config, true);
        let payload = parse_payload(&json.output);
        assert_eq!(payload[1]["id"], "yd2");
        assert_eq!(payload[1]["name"], "Night Owl");
    });
}

#[test]
fn products_reports_load_failure_class() {
    with_catalog(Some("not json"), |config| {
        let result = products::run(config, true);
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "catalog_parse");
    });
}

fn browse_with(contents: Option<&str>, script: &str) -> (u8, String) {
    let mut captured = (0, String::new());
    with_catalog(contents, |config| {
        let runtime = CatalogRuntime::from_config(config).expect("catalog runtime");
        let mut output = Vec::new();
        let exit_code = browse::run_with_io(&runtime, Cursor::new(script.as_bytes()), &mut output)
            .expect("terminal io");
        captured = (exit_code, String::from_utf8(output).expect("utf8 output"));
    });
    captured
}

/// Selects a product, rewrites the catalog file and moves the clock by `elapsed`,
/// then returns to the product menu and picks the first entry.
fn browse_across_rewrite(elapsed: Duration) -> String {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("young_driver_products.json");
    fs::write(&path, EXAMPLE_CATALOG).expect("write fixture");

    let clock = Arc::new(ManualClock::new(SystemClock.now()));
    let runtime = CatalogRuntime::with_clock(
        Arc::new(FileCatalogSource::new(&path)),
        Duration::from_secs(60),
        clock.clone(),
    )
    .expect("catalog runtime");

    let rewrite_path: PathBuf = path.clone();
    let input = ScriptedInput::new(vec![
        Step::Line("1\n"),
        Step::Then(Box::new(move || {
            fs::write(&rewrite_path, r#"[{"id": "yd9", "name": "Learner Cover"}]"#)
                .expect("rewrite fixture");
            clock.advance(elapsed);
        })),
        Step::Line("p\n"),
        Step::Line("1\n"),
        Step::Line("q\n"),
    ]);

    let mut output = Vec::new();
    let exit_code = browse::run_with_io(&runtime, input, &mut output).expect("terminal io");
    assert_eq!(exit_code, 0);
    String::from_utf8(output).expect("utf8 output")
}

enum Step {
    Line(&'static str),
    Then(Box<dyn FnMut()>),
}

/// Line-at-a-time input that runs side effects between lines.
struct ScriptedInput {
    steps: VecDeque<Step>,
    current: Vec<u8>,
    position: usize,
}

impl ScriptedInput {
    fn new(steps: Vec<Step>) -> Self {
        Self { steps: steps.into(), current: Vec::new(), position: 0 }
    }
}

impl Read for ScriptedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

impl BufRead for ScriptedInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while self.position >= self.current.len() {
            match self.steps.pop_front() {
                Some(Step::Line(line)) => {
                    self.current = line.as_bytes().to_vec();
                    self.position = 0;
                }
                Some(Step::Then(mut action)) => action(),
                None => return Ok(&[]),
            }
        }
        Ok(&self.current[self.position..])
    }

    fn consume(&mut self, amount: usize) {
        self.position += amount;
    }
}

fn with_catalog(contents: Option<&str>, test_fn: impl FnOnce(&AppConfig)) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("young_driver_products.json");
    if let Some(contents) = contents {
        fs::write(&path, contents).expect("write fixture");
    }

    with_env(&[], || {
        let config = load_config(&path);
        test_fn(&config);
    });
}

fn load_config(path: &Path) -> AppConfig {
    AppConfig::load(LoadOptions {
        overrides: ConfigOverrides {
            catalog_path: Some(path.to_path_buf()),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    })
    .expect("config should load")
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "COVERCAT_CATALOG_PATH",
        "COVERCAT_SERVER_BIND_ADDRESS",
        "COVERCAT_SERVER_PORT",
        "COVERCAT_CLIENT_SOURCE",
        "COVERCAT_CLIENT_BASE_URL",
        "COVERCAT_CLIENT_TIMEOUT_SECS",
        "COVERCAT_CLIENT_CACHE_TTL_SECS",
        "COVERCAT_LOGGING_LEVEL",
        "COVERCAT_LOGGING_FORMAT",
        "COVERCAT_LOG_LEVEL",
        "COVERCAT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
