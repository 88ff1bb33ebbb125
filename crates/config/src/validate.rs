//! Configuration validation.
//!
//! Two passes: [`validate_file`] checks syntax, unknown (misspelled) keys
//! and types of a config file; [`validate`] checks the resolved config for
//! missing credentials and settings that cannot work.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use secrecy::ExposeSecret;

use crate::{
    env_subst::substitute_env,
    loader::{load_config, parse_config_value},
    schema::FeedwatchConfig,
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "credentials",
    /// "permissions", "value"
    pub category: &'static str,
    /// Dotted path, e.g. "reddit.client_id"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} [{}]: {}", self.severity, self.category, self.message)
        } else {
            write!(
                f,
                "{} [{}] {}: {}",
                self.severity, self.category, self.path, self.message
            )
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
        if self.config_path.is_none() {
            self.config_path = other.config_path;
        }
    }
}

// ── Known keys ──────────────────────────────────────────────────────────────

const DISCORD_KEYS: &[&str] = &[
    "token",
    "command_prefix",
    "advanced_roles",
    "normal_roles",
    "embed_color",
];

const REDDIT_KEYS: &[&str] = &[
    "client_id",
    "client_secret",
    "user_agent",
    "auth_url",
    "api_base",
    "poll_interval_secs",
    "listing_limit",
    "request_timeout_secs",
];

const STORAGE_KEYS: &[&str] = &["path"];
const STREAM_KEYS: &[&str] = &["restart_delay_ms", "max_restart_delay_ms"];
const LOGGING_KEYS: &[&str] = &["level", "file", "json"];

/// Section name → field names, mirroring `schema.rs`.
fn known_keys() -> HashMap<&'static str, &'static [&'static str]> {
    HashMap::from([
        ("discord", DISCORD_KEYS),
        ("reddit", REDDIT_KEYS),
        ("storage", STORAGE_KEYS),
        ("stream", STREAM_KEYS),
        ("logging", LOGGING_KEYS),
    ])
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// ── Levenshtein distance ────────────────────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_len]
}

/// Closest candidate within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for &candidate in candidates {
        let d = levenshtein(needle, candidate);
        if d > 0 && d <= max_distance && best.as_ref().is_none_or(|(_, bd)| d < *bd) {
            best = Some((candidate, d));
        }
    }
    best.map(|(s, _)| s)
}

fn unknown_field(path: String, key: &str, candidates: &[&str]) -> Diagnostic {
    let message = match suggest(key, candidates, 3) {
        Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
        None => "unknown field".to_string(),
    };
    Diagnostic::new(Severity::Error, "unknown-field", path, message)
}

// ── File checks ─────────────────────────────────────────────────────────────

/// Validate a config file: readable, parseable, no unknown keys, right types.
#[must_use]
pub fn validate_file(path: &Path) -> ValidationResult {
    let mut result = ValidationResult {
        diagnostics: Vec::new(),
        config_path: Some(path.to_path_buf()),
    };

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => substitute_env(&raw),
        Err(e) => {
            result.diagnostics.push(Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("failed to read config file: {e}"),
            ));
            return result;
        },
    };

    let tree = match parse_config_value(&raw, path) {
        Ok(tree) => tree,
        Err(e) => {
            result.diagnostics.push(Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("syntax error: {e}"),
            ));
            return result;
        },
    };

    check_unknown_fields(&tree, &mut result.diagnostics);

    if let Err(e) = load_config(path) {
        result.diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        ));
    }

    result
}

fn check_unknown_fields(tree: &serde_json::Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = tree.as_object() else {
        if !tree.is_null() {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "type-error",
                "",
                "config root must be a table",
            ));
        }
        return;
    };

    let schema = known_keys();
    let sections: Vec<&str> = schema.keys().copied().collect();
    for (section, body) in root {
        let Some(fields) = schema.get(section.as_str()) else {
            diagnostics.push(unknown_field(section.clone(), section, &sections));
            continue;
        };
        let Some(body) = body.as_object() else {
            continue;
        };
        for key in body.keys() {
            if !fields.contains(&key.as_str()) {
                diagnostics.push(unknown_field(format!("{section}.{key}"), key, fields));
            }
        }
    }
}

// ── Semantic checks ─────────────────────────────────────────────────────────

/// Check a resolved config (file plus environment) for settings the bot
/// cannot start or run with.
#[must_use]
pub fn validate(config: &FeedwatchConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();

    if blank(config.discord.token.as_ref().map(|t| t.expose_secret().as_str())) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "credentials",
            "discord.token",
            "Discord bot token is missing (set DISCORD_BOT_TOKEN)",
        ));
    }
    if blank(config.reddit.client_id.as_deref()) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "credentials",
            "reddit.client_id",
            "Reddit client id is missing (set REDDIT_BOT_ID)",
        ));
    }
    if blank(
        config
            .reddit
            .client_secret
            .as_ref()
            .map(|s| s.expose_secret().as_str()),
    ) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "credentials",
            "reddit.client_secret",
            "Reddit client secret is missing (set REDDIT_BOT_SECRET)",
        ));
    }

    if config.discord.advanced_roles.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "permissions",
            "discord.advanced_roles",
            "no advanced roles configured; nobody can subscribe, unsubscribe, ban or unban",
        ));
    }
    if config.discord.normal_roles.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "permissions",
            "discord.normal_roles",
            "no normal roles configured; only advanced roles can fetch and list",
        ));
    }

    if config.discord.command_prefix.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "value",
            "discord.command_prefix",
            "command prefix must not be empty",
        ));
    }
    if config.discord.embed_color > 0xFF_FFFF {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "value",
            "discord.embed_color",
            format!("{:#x} is not a 24-bit RGB colour", config.discord.embed_color),
        ));
    }

    if config.reddit.poll_interval_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "value",
            "reddit.poll_interval_secs",
            "poll interval must be at least one second",
        ));
    }
    if config.reddit.listing_limit == 0 || config.reddit.listing_limit > 100 {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "value",
            "reddit.listing_limit",
            "Reddit returns between 1 and 100 items per listing",
        ));
    }

    if config.stream.restart_delay_ms > config.stream.max_restart_delay_ms {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "value",
            "stream.restart_delay_ms",
            "restart delay exceeds max_restart_delay_ms; the maximum is used",
        ));
    }

    check_log_level(&config.logging.level, &mut diagnostics);

    if let Some(parent) = config.storage.path.parent()
        && !parent.as_os_str().is_empty()
        && parent.exists()
        && !parent.is_dir()
    {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "value",
            "storage.path",
            format!("{} is not a directory", parent.display()),
        ));
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

/// Plain levels are checked; full filter directives are left to the subscriber.
fn check_log_level(level: &str, diagnostics: &mut Vec<Diagnostic>) {
    let level = level.trim().to_lowercase();
    if level.contains('=') || level.contains(',') || LOG_LEVELS.contains(&level.as_str()) {
        return;
    }
    let message = match suggest(&level, LOG_LEVELS, 2) {
        Some(s) => format!("unknown log level \"{level}\" (did you mean \"{s}\"?)"),
        None => format!("unknown log level \"{level}\""),
    };
    diagnostics.push(Diagnostic::new(
        Severity::Warning,
        "value",
        "logging.level",
        message,
    ));
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    fn complete() -> FeedwatchConfig {
        let mut cfg = FeedwatchConfig::default();
        cfg.discord.token = Some(Secret::new("tok".into()));
        cfg.discord.advanced_roles = vec!["Mods".into()];
        cfg.discord.normal_roles = vec!["Members".into()];
        cfg.reddit.client_id = Some("id".into());
        cfg.reddit.client_secret = Some(Secret::new("secret".into()));
        cfg
    }

    fn paths(result: &ValidationResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn levenshtein_edits() {
        assert_eq!(levenshtein("token", "token"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("tokn", "token"), 1);
        assert_eq!(levenshtein("cat", "bat"), 1);
    }

    #[test]
    fn complete_config_is_clean() {
        let result = validate(&complete());
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn missing_credentials_are_errors() {
        let result = validate(&FeedwatchConfig::default());
        assert!(result.has_errors());
        assert_eq!(result.count(Severity::Error), 3);
        let found = paths(&result);
        assert!(found.contains(&"discord.token"));
        assert!(found.contains(&"reddit.client_id"));
        assert!(found.contains(&"reddit.client_secret"));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let mut cfg = complete();
        cfg.discord.token = Some(Secret::new("   ".into()));
        assert!(validate(&cfg).has_errors());
    }

    #[test]
    fn empty_roles_are_warnings() {
        let mut cfg = complete();
        cfg.discord.advanced_roles.clear();
        cfg.discord.normal_roles.clear();
        let result = validate(&cfg);
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 2);
    }

    #[test]
    fn bad_values_flagged() {
        let mut cfg = complete();
        cfg.discord.embed_color = 0x1_000_000;
        cfg.reddit.poll_interval_secs = 0;
        cfg.reddit.listing_limit = 500;
        cfg.stream.restart_delay_ms = 10_000;
        cfg.stream.max_restart_delay_ms = 1_000;
        let result = validate(&cfg);
        let found = paths(&result);
        assert!(found.contains(&"discord.embed_color"));
        assert!(found.contains(&"reddit.poll_interval_secs"));
        assert!(found.contains(&"reddit.listing_limit"));
        assert!(found.contains(&"stream.restart_delay_ms"));
    }

    #[test]
    fn misspelled_log_level_suggested() {
        let mut cfg = complete();
        cfg.logging.level = "debg".into();
        let result = validate(&cfg);
        assert_eq!(result.count(Severity::Warning), 1);
        assert!(result.diagnostics[0].message.contains("did you mean \"debug\""));
    }

    #[test]
    fn filter_directive_accepted() {
        let mut cfg = complete();
        cfg.logging.level = "info,feedwatch_feeds=debug".into();
        assert!(validate(&cfg).diagnostics.is_empty());
    }

    #[test]
    fn unknown_keys_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedwatch.toml");
        std::fs::write(
            &path,
            "[discrod]\ntoken = \"x\"\n\n[reddit]\nclient_ide = \"abc\"\n",
        )
        .unwrap();
        let result = validate_file(&path);
        let messages: Vec<String> = result.diagnostics.iter().map(ToString::to_string).collect();
        assert!(
            messages
                .iter()
                .any(|m| m.contains("discrod") && m.contains("did you mean \"discord\"")),
            "{messages:?}"
        );
        assert!(
            messages
                .iter()
                .any(|m| m.contains("reddit.client_ide") && m.contains("\"client_id\"")),
            "{messages:?}"
        );
    }

    #[test]
    fn syntax_error_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedwatch.toml");
        std::fs::write(&path, "[discord\n").unwrap();
        let result = validate_file(&path);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].category, "syntax");
    }

    #[test]
    fn type_error_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedwatch.json");
        std::fs::write(&path, r#"{"reddit": {"poll_interval_secs": "soon"}}"#).unwrap();
        let result = validate_file(&path);
        assert!(result.diagnostics.iter().any(|d| d.category == "type-error"));
    }

    #[test]
    fn clean_file_has_no_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedwatch.yaml");
        std::fs::write(&path, "discord:\n  advanced_roles: [Mods]\nstream:\n  restart_delay_ms: 100\n")
            .unwrap();
        assert!(validate_file(&path).diagnostics.is_empty());
    }
}
