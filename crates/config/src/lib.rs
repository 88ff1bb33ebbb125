//! Configuration loading, validation and env overrides.
//!
//! Config files: `feedwatch.toml`, `feedwatch.yaml`, or `feedwatch.json`
//! Searched in `./` then `~/.config/feedwatch/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values. The bot's
//! environment variables (`DISCORD_BOT_TOKEN`, `REDDIT_BOT_ID`, ...) win
//! over the file.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        apply_env_overrides, config_dir, discover_and_load, find_config_file, load_config, resolve,
    },
    schema::{
        DiscordConfig, FeedwatchConfig, LoggingConfig, RedditConfig, StorageConfig, StreamConfig,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_file},
};
