//! Photo artifact lifecycle: the storage seam plus the library that owns
//! the app's private photo directory.
//!
//! The core never reads photo bytes.  It imports captured files by
//! reference and purges the whole directory on each daily reset.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// External photo storage collaborator.  Refs are opaque strings (URIs or
/// paths); what they point at is the implementation's business.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn exists(&self, dir: &str) -> Result<bool>;
    async fn create_dir(&self, dir: &str) -> Result<()>;
    /// Refs of the files directly inside `dir`.
    async fn list_files(&self, dir: &str) -> Result<Vec<String>>;
    async fn delete(&self, file: &str) -> Result<()>;
    async fn copy_or_move(&self, src: &str, dest: &str) -> Result<()>;
}

/// Local-filesystem photo store; refs are plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPhotoStore;

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn exists(&self, dir: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(dir).await?)
    }

    async fn create_dir(&self, dir: &str) -> Result<()> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path().to_string_lossy().into_owned());
            }
        }
        Ok(files)
    }

    async fn delete(&self, file: &str) -> Result<()> {
        tokio::fs::remove_file(file).await?;
        Ok(())
    }

    async fn copy_or_move(&self, src: &str, dest: &str) -> Result<()> {
        // Rename first; fall back to copy+remove across filesystems.
        if tokio::fs::rename(src, dest).await.is_ok() {
            return Ok(());
        }
        tokio::fs::copy(src, dest).await?;
        tokio::fs::remove_file(src).await?;
        Ok(())
    }
}

/// Owns the app's private photo directory: imports captures in, purges
/// everything out on reset.
#[derive(Clone)]
pub struct PhotoLibrary {
    store: Arc<dyn PhotoStore>,
    dir: String,
}

impl PhotoLibrary {
    pub fn new(store: Arc<dyn PhotoStore>, dir: impl Into<String>) -> Self {
        Self {
            store,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Move a freshly captured photo into the library under a generated
    /// unique name, creating the directory on first use.  Returns the new
    /// ref to attach to the checked item.
    pub async fn import(&self, src: &str) -> Result<String> {
        if !self.store.exists(&self.dir).await? {
            self.store.create_dir(&self.dir).await?;
        }

        let extension = src
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && !ext.contains('/'))
            .unwrap_or("jpg");
        let dest = format!(
            "{}/photo_{}.{extension}",
            self.dir.trim_end_matches('/'),
            Uuid::new_v4()
        );

        self.store.copy_or_move(src, &dest).await?;
        debug!(%src, %dest, "imported photo");
        Ok(dest)
    }

    /// Delete every file in the photo directory — stray files included,
    /// not just refs attached to checked items.  Individual failures are
    /// logged and skipped; the purge never aborts.  Returns how many
    /// files were actually deleted.
    pub async fn purge_all(&self) -> usize {
        match self.store.exists(&self.dir).await {
            Ok(true) => {}
            Ok(false) => return 0,
            Err(err) => {
                warn!(%err, dir = %self.dir, "failed to probe photo directory, skipping purge");
                return 0;
            }
        }

        let files = match self.store.list_files(&self.dir).await {
            Ok(files) => files,
            Err(err) => {
                warn!(%err, dir = %self.dir, "failed to list photo directory, skipping purge");
                return 0;
            }
        };

        let mut deleted = 0usize;
        for file in files {
            match self.store.delete(&file).await {
                Ok(()) => deleted += 1,
                Err(err) => warn!(%file, %err, "failed to delete photo, leaving it behind"),
            }
        }

        info!(deleted, dir = %self.dir, "purged photo directory");
        deleted
    }
}
