use thiserror::Error;

use crate::types::DestinationId;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("subreddit {feed} is already subscribed")]
    AlreadySubscribed {
        destination: DestinationId,
        feed: String,
    },

    #[error("subreddit {feed} is not subscribed")]
    NotSubscribed {
        destination: DestinationId,
        feed: String,
    },

    #[error("subreddit {feed} is banned")]
    Banned { feed: String },

    #[error("subreddit {feed} does not exist")]
    FeedNotFound { feed: String },

    /// Timeouts, resets, rate limits and 5xx responses. Safe to retry.
    #[error("{context}: {source}")]
    Transient {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Rejected credentials or a request the platform will never accept.
    #[error("{message}")]
    Fatal { message: String },

    #[error("{message}")]
    Message { message: String },

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn feed_not_found(feed: impl Into<String>) -> Self {
        Self::FeedNotFound { feed: feed.into() }
    }

    #[must_use]
    pub fn transient(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transient {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Errors caused by what the user typed. Reported back, never logged as faults.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::AlreadySubscribed { .. }
                | Self::NotSubscribed { .. }
                | Self::Banned { .. }
                | Self::FeedNotFound { .. }
        )
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
