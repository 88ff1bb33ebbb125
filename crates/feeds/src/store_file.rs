//! JSON file-backed subscription store with atomic writes.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use {
    async_trait::async_trait,
    tokio::fs,
    tracing::{debug, warn},
};

use crate::{Result, store::SubscriptionStore, types::PersistedDocument};

/// Single JSON document on disk, e.g. `data/subreddits.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the bytes of an unreadable document are kept. Saves never touch it.
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("subscriptions"));
        name.push(suffix);
        self.path.with_file_name(name)
    }

    async fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write to a temp sibling, then rename it over the target. The rename
    /// replaces the old document in one step, so readers see old or new.
    async fn atomic_write(&self, document: &PersistedDocument) -> Result<()> {
        self.ensure_dirs().await?;
        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.sibling(".tmp");

        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for JsonFileStore {
    async fn load(&self, default: PersistedDocument) -> Result<PersistedDocument> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no subscription document, writing default");
                self.atomic_write(&default).await?;
                return Ok(default);
            },
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<PersistedDocument>(&raw) {
            Ok(document) => Ok(document),
            Err(e) => {
                let corrupt = self.corrupt_path();
                warn!(
                    path = %self.path.display(),
                    kept = %corrupt.display(),
                    error = %e,
                    "corrupt subscription document, replacing with default"
                );
                fs::write(&corrupt, raw.as_bytes()).await?;
                self.atomic_write(&default).await?;
                Ok(default)
            },
        }
    }

    async fn save(&self, document: &PersistedDocument) -> Result<()> {
        self.atomic_write(document).await
    }
}
