/// Config schema types (discord, reddit, storage, stream, logging).
use std::{path::PathBuf, time::Duration};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedwatchConfig {
    pub discord: DiscordConfig,
    pub reddit: RedditConfig,
    pub storage: StorageConfig,
    pub stream: StreamConfig,
    pub logging: LoggingConfig,
}

/// Discord bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,
    /// Prefix that marks a message as a command. Defaults to "!".
    pub command_prefix: String,
    /// Roles (by name or id) allowed to change subscriptions and bans.
    pub advanced_roles: Vec<String>,
    /// Roles (by name or id) allowed to read listings and fetch posts.
    pub normal_roles: Vec<String>,
    /// Embed sidebar colour as 0xRRGGBB.
    pub embed_color: u32,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            command_prefix: "!".into(),
            advanced_roles: Vec::new(),
            normal_roles: Vec::new(),
            embed_color: 0x00FF00,
        }
    }
}

/// Reddit API credentials and polling behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub client_id: Option<String>,
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret: Option<Secret<String>>,
    /// Defaults to `DISCORD_BOT:<client_id>:1.0` when unset.
    pub user_agent: Option<String>,
    pub auth_url: String,
    pub api_base: String,
    pub poll_interval_secs: u64,
    /// Items requested per listing call. Reddit caps this at 100.
    pub listing_limit: u32,
    pub request_timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: None,
            auth_url: "https://www.reddit.com/api/v1/access_token".into(),
            api_base: "https://oauth.reddit.com".into(),
            poll_interval_secs: 15,
            listing_limit: 100,
            request_timeout_secs: 30,
        }
    }
}

impl RedditConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where the subscription document lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/subreddits.json"),
        }
    }
}

/// Restart pacing for the streaming loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub restart_delay_ms: u64,
    pub max_restart_delay_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 5_000,
            max_restart_delay_ms: 300_000,
        }
    }
}

impl StreamConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn max_restart_delay(&self) -> Duration {
        Duration::from_millis(self.max_restart_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "feedwatch_feeds=debug". `RUST_LOG` wins.
    pub level: String,
    /// Append logs to this file in addition to stderr.
    pub file: Option<PathBuf>,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
            json: false,
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
