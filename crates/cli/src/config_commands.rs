use std::path::Path;

use anyhow::Result;

use {
    feedwatch_config::{
        FeedwatchConfig, ValidationResult, find_config_file,
        validate::{self, Severity},
    },
    feedwatch_feeds::RedditClient,
};

use crate::bot_commands::reddit_client_config;

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Validate the config file and the resolved settings, then try the Reddit
/// credentials. Exits with status 1 when anything is an error.
pub async fn check(
    config: &FeedwatchConfig,
    explicit: Option<&Path>,
    verbose: bool,
    offline: bool,
) -> Result<()> {
    let mut result = ValidationResult::default();
    match explicit.map(Path::to_path_buf).or_else(find_config_file) {
        Some(path) => {
            eprintln!("Checking {}\n", path.display());
            result.merge(validate::validate_file(&path));
        },
        None => eprintln!("No config file found; checking defaults and environment.\n"),
    }
    result.merge(validate::validate(config));

    if !offline && !result.has_errors() {
        let credentials = match RedditClient::new(reddit_client_config(&config.reddit)) {
            Ok(client) => client.authenticate().await,
            Err(e) => Err(e),
        };
        match credentials {
            Ok(()) => eprintln!("  {BOLD}{GREEN}ok{RESET} reddit credentials accepted\n"),
            Err(e) => result.diagnostics.push(validate::Diagnostic {
                severity: Severity::Error,
                category: "credentials",
                path: "reddit".into(),
                message: format!("credential check failed: {e}"),
            }),
        }
    }

    let shown = print_diagnostics(&result, verbose);

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_diagnostics(result: &ValidationResult, verbose: bool) -> usize {
    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
            Severity::Info => (CYAN, "info"),
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{label}{RESET} {}", d.message);
        } else {
            eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
        }
        shown += 1;
    }
    shown
}
