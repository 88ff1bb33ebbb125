//! Subscription engine: channels subscribe to subreddits, new posts stream in.
//! Persistent storage at `data/subreddits.json` (configurable).
//! One merged stream over every subscribed subreddit, restarted on change.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod reddit;
pub mod registry;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod stream;
pub mod types;

pub use {
    client::{FeedClient, FeedStream},
    dispatch::{DispatchError, DispatchSink},
    error::{Error, Result},
    reddit::{RedditClient, RedditClientConfig},
    registry::SubscriptionRegistry,
    store::SubscriptionStore,
    store_file::JsonFileStore,
    store_memory::InMemoryStore,
    stream::{StreamConfig, StreamService, StreamState},
    types::{DestinationId, FeedItem, PersistedDocument, Subscription, normalize_feed_name},
};
