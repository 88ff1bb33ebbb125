//! Delivery of feed items to chat destinations.

use async_trait::async_trait;

use crate::types::{DestinationId, FeedItem};

/// Errors a sink can report for a single delivery.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The destination was deleted or the bot lost access to it.
    #[error("destination {destination} no longer exists")]
    DestinationGone { destination: DestinationId },

    #[error("delivery to {destination} failed: {source}")]
    External {
        destination: DestinationId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DispatchError {
    #[must_use]
    pub fn external(
        destination: DestinationId,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            destination,
            source: Box::new(source),
        }
    }
}

/// Chat platform side of the engine: "deliver item X to destination Y".
#[async_trait]
pub trait DispatchSink: Send + Sync {
    async fn deliver(
        &self,
        destination: DestinationId,
        item: &FeedItem,
    ) -> Result<(), DispatchError>;
}
