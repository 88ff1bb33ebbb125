//! In-memory store for testing.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{Result, store::SubscriptionStore, types::PersistedDocument};

/// Holds the document in a `Mutex`. No persistence; tests only.
#[derive(Default)]
pub struct InMemoryStore {
    document: Mutex<Option<PersistedDocument>>,
    saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document, as if it had been persisted earlier.
    pub fn with_document(document: PersistedDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Current stored document, if one has been written.
    pub fn snapshot(&self) -> Option<PersistedDocument> {
        self.document
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn load(&self, default: PersistedDocument) -> Result<PersistedDocument> {
        let mut document = self.document.lock().unwrap_or_else(|e| e.into_inner());
        Ok(document.get_or_insert(default).clone())
    }

    async fn save(&self, document: &PersistedDocument) -> Result<()> {
        let mut stored = self.document.lock().unwrap_or_else(|e| e.into_inner());
        *stored = Some(document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
