//! Streaming loop: one merged feed session, fanned out to every destination.
//!
//! The loop owns at most one session at a time. A registry mutation, a
//! session failure or a stream that ends all lead back to re-reading the
//! routes and opening a fresh session. Cancellation is the only way out.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use {
    futures::StreamExt,
    serde::Serialize,
    tokio::{
        sync::{Mutex, Notify, watch},
        task::JoinHandle,
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use crate::{
    Error,
    client::{FeedClient, FeedStream},
    dispatch::{DispatchError, DispatchSink},
    registry::SubscriptionRegistry,
    types::{DestinationId, FeedItem},
};

type Routes = BTreeMap<String, Vec<DestinationId>>;

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    /// Nothing subscribed; waiting for a reconfiguration.
    Idle,
    /// A session is open and being read.
    Streaming,
    /// The previous session was dropped; a new one is about to open.
    Restarting,
    /// Cancelled. Terminal.
    Stopped,
}

/// Pacing of restarts after a failed session.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// First wait after a failure. Doubles on each consecutive failure.
    pub restart_delay: Duration,
    pub max_restart_delay: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            restart_delay: Duration::from_secs(5),
            max_restart_delay: Duration::from_secs(300),
        }
    }
}

/// How a session ended.
enum SessionEnd {
    Cancelled,
    Reconfigured,
    Failed(Error),
    Ended,
}

/// Background task delivering new items from all subscribed feeds.
pub struct StreamService {
    registry: Arc<SubscriptionRegistry>,
    client: Arc<dyn FeedClient>,
    sink: Arc<dyn DispatchSink>,
    config: StreamConfig,
    state: watch::Sender<StreamState>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
    sessions_opened: AtomicU64,
}

impl StreamService {
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        client: Arc<dyn FeedClient>,
        sink: Arc<dyn DispatchSink>,
        config: StreamConfig,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(StreamState::Idle);
        Arc::new(Self {
            registry,
            client,
            sink,
            config,
            state,
            cancel: CancellationToken::new(),
            handle: Mutex::new(None),
            sessions_opened: AtomicU64::new(0),
        })
    }

    /// Spawn the loop. Calling it again while running is a no-op.
    pub async fn start(self: &Arc<Self>) {
        let mut handle = self.handle.lock().await;
        if handle.is_some() || self.cancel.is_cancelled() {
            return;
        }
        let svc = Arc::clone(self);
        *handle = Some(tokio::spawn(async move {
            svc.run().await;
        }));
        info!("stream service started");
    }

    /// Cancel the loop and wait for it to drop its session.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            warn!(error = %e, "stream task did not shut down cleanly");
        }
        self.state.send_replace(StreamState::Stopped);
        info!("stream service stopped");
    }

    pub fn state(&self) -> StreamState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    pub fn watch_state(&self) -> watch::Receiver<StreamState> {
        self.state.subscribe()
    }

    /// Number of sessions opened since start.
    pub fn sessions_opened(&self) -> u64 {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    // ── Internal ────────────────────────────────────────────────────────

    fn set_state(&self, state: StreamState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = ?previous, to = ?state, "stream state changed");
        }
    }

    async fn run(self: Arc<Self>) {
        let reconfigure = self.registry.reconfigure_signal();
        let mut delay = self.config.restart_delay;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let routes = self.registry.routes().await;
            if routes.is_empty() {
                self.set_state(StreamState::Idle);
                debug!("no subscriptions, stream idle");
                tokio::select! {
                    () = self.cancel.cancelled() => break,
                    () = reconfigure.notified() => continue,
                }
            }

            let names: BTreeSet<String> = routes.keys().cloned().collect();
            let mut delivered = false;
            let end = tokio::select! {
                biased;
                () = self.cancel.cancelled() => SessionEnd::Cancelled,
                () = reconfigure.notified() => SessionEnd::Reconfigured,
                opened = self.client.open_stream(&names) => match opened {
                    Ok(stream) => {
                        self.set_state(StreamState::Streaming);
                        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
                        info!(feeds = names.len(), "stream session opened");
                        self.pump(stream, &routes, &reconfigure, &mut delivered).await
                    },
                    Err(e) => SessionEnd::Failed(e),
                },
            };

            if delivered {
                delay = self.config.restart_delay;
            }

            match end {
                SessionEnd::Cancelled => break,
                SessionEnd::Reconfigured => {
                    self.set_state(StreamState::Restarting);
                    info!("subscriptions changed, restarting stream");
                    continue;
                },
                SessionEnd::Failed(e) if e.is_transient() => {
                    warn!(error = %e, retry_in = ?delay, "stream interrupted, restarting");
                },
                SessionEnd::Failed(e) => {
                    error!(error = %e, retry_in = ?delay, "stream failed, restarting");
                },
                SessionEnd::Ended => {
                    warn!(retry_in = ?delay, "stream ended, restarting");
                },
            }

            self.set_state(StreamState::Restarting);
            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = reconfigure.notified() => {},
                () = tokio::time::sleep(delay) => {},
            }
            delay = (delay * 2).min(self.config.max_restart_delay);
        }

        self.set_state(StreamState::Stopped);
        debug!("stream loop exited");
    }

    /// Read one session until it fails or is superseded. The session is
    /// dropped on return.
    async fn pump(
        &self,
        mut stream: FeedStream,
        routes: &Routes,
        reconfigure: &Notify,
        delivered: &mut bool,
    ) -> SessionEnd {
        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return SessionEnd::Cancelled,
                () = reconfigure.notified() => return SessionEnd::Reconfigured,
                next = stream.next() => match next {
                    Some(Ok(item)) => {
                        self.dispatch(&item, routes).await;
                        *delivered = true;
                    },
                    Some(Err(e)) => return SessionEnd::Failed(e),
                    None => return SessionEnd::Ended,
                },
            }
        }
    }

    async fn dispatch(&self, item: &FeedItem, routes: &Routes) {
        let Some(destinations) = routes.get(&item.feed.to_lowercase()) else {
            debug!(feed = %item.feed, id = %item.id, "item from unsubscribed feed, skipping");
            return;
        };

        for &destination in destinations {
            match self.sink.deliver(destination, item).await {
                Ok(()) => {
                    debug!(destination, feed = %item.feed, id = %item.id, "item delivered");
                },
                Err(DispatchError::DestinationGone { .. }) => {
                    debug!(destination, feed = %item.feed, "destination gone, item dropped");
                },
                Err(e) => {
                    warn!(destination, feed = %item.feed, error = %e, "item delivery failed");
                },
            }
        }
    }
}
