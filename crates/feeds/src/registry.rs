//! Subscription registry: the in-memory, write-through view over the store.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use {
    tokio::sync::{Mutex, Notify},
    tracing::{debug, info},
};

use crate::{
    Error, Result,
    client::FeedClient,
    store::SubscriptionStore,
    types::{DestinationId, PersistedDocument, Subscription},
};

/// Owner of all subscription and ban state.
///
/// Mutations run read → mutate → persist under one lock, so they never
/// interleave. The in-memory copy only changes after the store accepted the
/// new document. Every successful mutation wakes the streaming loop.
pub struct SubscriptionRegistry {
    store: Arc<dyn SubscriptionStore>,
    client: Arc<dyn FeedClient>,
    document: Mutex<PersistedDocument>,
    reconfigure: Arc<Notify>,
}

impl SubscriptionRegistry {
    /// Hydrate from the store, replacing a missing or corrupt document with
    /// the empty default.
    pub async fn open(
        store: Arc<dyn SubscriptionStore>,
        client: Arc<dyn FeedClient>,
    ) -> Result<Arc<Self>> {
        let document = store.load(PersistedDocument::default()).await?;
        info!(
            subscriptions = document.subscribed.len(),
            banned = document.banned.len(),
            "loaded subscriptions"
        );
        Ok(Arc::new(Self {
            store,
            client,
            document: Mutex::new(document),
            reconfigure: Arc::new(Notify::new()),
        }))
    }

    /// Signal fired after every mutation. A notification sent while nobody
    /// waits is kept until the next wait.
    pub fn reconfigure_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.reconfigure)
    }

    pub async fn is_banned(&self, feed: &str) -> bool {
        self.document.lock().await.banned.contains(feed)
    }

    pub async fn is_subscribed(&self, destination: DestinationId, feed: &str) -> bool {
        self.document
            .lock()
            .await
            .subscribed
            .iter()
            .any(|s| s.matches(destination, feed))
    }

    /// Subscribe `destination` to `feed`.
    ///
    /// Checked in order: banned, already subscribed, exists remotely. The
    /// remote check runs outside the lock, so the first two are repeated
    /// before the subscription is appended.
    pub async fn subscribe(&self, destination: DestinationId, feed: &str) -> Result<()> {
        {
            let document = self.document.lock().await;
            check_subscribable(&document, destination, feed)?;
        }

        if !self.client.exists(feed).await {
            debug!(feed, "subscribe rejected: subreddit does not exist");
            return Err(Error::feed_not_found(feed));
        }

        let mut document = self.document.lock().await;
        check_subscribable(&document, destination, feed)?;

        let mut updated = document.clone();
        updated
            .subscribed
            .push(Subscription::new(destination, feed));
        self.commit(&mut document, updated).await?;

        info!(destination, feed, "subscribed");
        Ok(())
    }

    pub async fn unsubscribe(&self, destination: DestinationId, feed: &str) -> Result<()> {
        let mut document = self.document.lock().await;
        let Some(pos) = document
            .subscribed
            .iter()
            .position(|s| s.matches(destination, feed))
        else {
            debug!(destination, feed, "unsubscribe rejected: not subscribed");
            return Err(Error::NotSubscribed {
                destination,
                feed: feed.to_string(),
            });
        };

        let mut updated = document.clone();
        updated.subscribed.remove(pos);
        self.commit(&mut document, updated).await?;

        info!(destination, feed, "unsubscribed");
        Ok(())
    }

    /// Ban `feed`, removing every subscription to it first. Persists once.
    pub async fn ban(&self, feed: &str) -> Result<()> {
        let mut document = self.document.lock().await;
        let mut updated = document.clone();
        let before = updated.subscribed.len();
        updated.subscribed.retain(|s| s.feed != feed);
        let removed = before - updated.subscribed.len();
        updated.banned.insert(feed.to_string());
        self.commit(&mut document, updated).await?;

        info!(feed, removed, "subreddit banned");
        Ok(())
    }

    /// Lift a ban. Subscriptions removed by the ban stay removed.
    pub async fn unban(&self, feed: &str) -> Result<()> {
        let mut document = self.document.lock().await;
        let mut updated = document.clone();
        let was_banned = updated.banned.remove(feed);
        self.commit(&mut document, updated).await?;

        info!(feed, was_banned, "subreddit unbanned");
        Ok(())
    }

    pub async fn list_subscriptions(&self) -> Vec<Subscription> {
        self.document.lock().await.subscribed.clone()
    }

    pub async fn list_banned(&self) -> BTreeSet<String> {
        self.document.lock().await.banned.clone()
    }

    /// Feed name → destinations, for fan-out. Destination order follows
    /// subscription order.
    pub async fn routes(&self) -> BTreeMap<String, Vec<DestinationId>> {
        let document = self.document.lock().await;
        let mut routes: BTreeMap<String, Vec<DestinationId>> = BTreeMap::new();
        for sub in &document.subscribed {
            let destinations = routes.entry(sub.feed.to_lowercase()).or_default();
            if !destinations.contains(&sub.destination) {
                destinations.push(sub.destination);
            }
        }
        routes
    }

    /// Persist `updated`, then make it current and wake the stream loop.
    async fn commit(
        &self,
        current: &mut PersistedDocument,
        updated: PersistedDocument,
    ) -> Result<()> {
        self.store.save(&updated).await?;
        *current = updated;
        self.reconfigure.notify_one();
        Ok(())
    }
}

fn check_subscribable(
    document: &PersistedDocument,
    destination: DestinationId,
    feed: &str,
) -> Result<()> {
    if document.banned.contains(feed) {
        debug!(feed, "subscribe rejected: subreddit is banned");
        return Err(Error::Banned {
            feed: feed.to_string(),
        });
    }
    if document
        .subscribed
        .iter()
        .any(|s| s.matches(destination, feed))
    {
        debug!(destination, feed, "subscribe rejected: already subscribed");
        return Err(Error::AlreadySubscribed {
            destination,
            feed: feed.to_string(),
        });
    }
    Ok(())
}
