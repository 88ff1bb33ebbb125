//! Persistence trait for the subscription document.

use async_trait::async_trait;

use crate::{Result, types::PersistedDocument};

/// Persistence backend for subscriptions and bans.
///
/// The document is the unit of persistence: `save` replaces it in full and
/// there are no partial writes.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Read the document. A missing or unparseable document is replaced by
    /// `default`, which is written back and returned.
    async fn load(&self, default: PersistedDocument) -> Result<PersistedDocument>;

    async fn save(&self, document: &PersistedDocument) -> Result<()>;
}
