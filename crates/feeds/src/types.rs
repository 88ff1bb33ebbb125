//! Core data types for subscriptions, bans and feed items.

use std::collections::BTreeSet;

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Opaque identifier of a delivery destination (a chat channel).
pub type DestinationId = u64;

/// One channel ↔ subreddit pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Subscription {
    #[serde(rename = "channel_id")]
    pub destination: DestinationId,
    #[serde(rename = "subreddit")]
    pub feed: String,
}

impl Subscription {
    pub fn new(destination: DestinationId, feed: impl Into<String>) -> Self {
        Self {
            destination,
            feed: feed.into(),
        }
    }

    pub fn matches(&self, destination: DestinationId, feed: &str) -> bool {
        self.destination == destination && self.feed == feed
    }
}

/// The whole persisted state. Written in full on every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedDocument {
    #[serde(default)]
    pub subscribed: Vec<Subscription>,
    #[serde(default)]
    pub banned: BTreeSet<String>,
}

/// A single published item, fetched then rendered then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Platform id, used to skip items already seen by a stream.
    pub id: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub author_avatar: Option<String>,
    pub body: Option<String>,
    pub published_at: DateTime<Utc>,
    /// Feed the item was published in, as reported by the platform.
    pub feed: String,
}

/// Normalize user-typed feed names: strip the `r/` prefix, trim, lower-case.
pub fn normalize_feed_name(input: &str) -> String {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .or_else(|| trimmed.strip_prefix("R/"))
        .unwrap_or(trimmed);
    stripped.trim_end_matches('/').to_lowercase()
}
