use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::FeedwatchConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "feedwatch.toml",
    "feedwatch.yaml",
    "feedwatch.yml",
    "feedwatch.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<FeedwatchConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./feedwatch.{toml,yaml,yml,json}` (working directory)
/// 2. `~/.config/feedwatch/feedwatch.{toml,yaml,yml,json}` (user-global)
///
/// Returns `FeedwatchConfig::default()` if no config file is found.
pub fn discover_and_load() -> FeedwatchConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    FeedwatchConfig::default()
}

/// Resolve the effective config: the explicit file when given (errors are
/// returned), otherwise discovery, then environment overrides on top.
pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<FeedwatchConfig> {
    let config = match explicit {
        Some(path) => load_config(path)?,
        None => discover_and_load(),
    };
    Ok(apply_env_overrides(config))
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let config_dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/feedwatch/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "feedwatch").map(|d| d.config_dir().to_path_buf())
}

/// Apply the bot's environment variables over the file config.
///
/// Blank values are ignored. Role lists are comma separated.
pub fn apply_env_overrides(config: FeedwatchConfig) -> FeedwatchConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

pub(crate) fn apply_env_overrides_with(
    mut config: FeedwatchConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> FeedwatchConfig {
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(token) = get("DISCORD_BOT_TOKEN") {
        config.discord.token = Some(Secret::new(token));
    }
    if let Some(roles) = get("DISCORD_BOT_ADVANCED_COMMANDS_ROLES") {
        config.discord.advanced_roles = split_list(&roles);
    }
    if let Some(roles) = get("DISCORD_BOT_NORMAL_COMMANDS_ROLES") {
        config.discord.normal_roles = split_list(&roles);
    }
    if let Some(id) = get("REDDIT_BOT_ID") {
        config.reddit.client_id = Some(id);
    }
    if let Some(secret) = get("REDDIT_BOT_SECRET") {
        config.reddit.client_secret = Some(Secret::new(secret));
    }
    if let Some(path) = get("FILENAME") {
        config.storage.path = PathBuf::from(path);
    }
    if let Some(path) = get("LOGFILENAME") {
        config.logging.file = Some(PathBuf::from(path));
    }
    if let Some(level) = get("LOGLEVEL") {
        config.logging.level = level.to_lowercase();
    }
    config
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<FeedwatchConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

/// Parse into a format-neutral tree, for validation of unknown keys.
pub(crate) fn parse_config_value(raw: &str, path: &Path) -> anyhow::Result<serde_json::Value> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
