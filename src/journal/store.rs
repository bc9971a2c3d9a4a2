//! JSON file store with size/age-triggered rollover.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::JournalConfig;

/// Errors from journal I/O.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Store for a single JSON document with rolled-over snapshots.
///
/// Every operation, readers included, holds the single lock for the whole
/// open-read/write-close sequence, so writes and rollovers observe a total
/// order.
///
/// When disabled, all operations are no-ops: `load` reports no document,
/// `write` silently drops.
pub struct JournalStore {
    options: JournalConfig,
    lock: Mutex<()>,
}

impl JournalStore {
    pub fn new(options: JournalConfig) -> Self {
        Self {
            options,
            lock: Mutex::new(()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn file_path(&self) -> &Path {
        &self.options.file_path
    }

    /// Create an empty document (and parent directories) if none exists.
    pub async fn ensure_file(&self) -> Result<(), JournalError> {
        if !self.options.enabled {
            return Ok(());
        }
        let _guard = self.lock.lock().await;

        let path = &self.options.file_path;
        if tokio::fs::try_exists(path)
            .await
            .map_err(|e| JournalError::io(path, e))?
        {
            return Ok(());
        }
        self.create_empty_locked().await?;
        info!(path = %path.display(), "Journal created");
        Ok(())
    }

    /// Load the current document; `None` when the file is absent or empty.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, JournalError> {
        if !self.options.enabled {
            return Ok(None);
        }
        let _guard = self.lock.lock().await;
        self.read_locked().await
    }

    /// Alias of [`Self::load`].
    pub async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, JournalError> {
        self.load().await
    }

    /// Replace the document. Runs the rollover check first, so a document
    /// over its size or age limit is archived before the write proceeds.
    pub async fn write<T: Serialize>(&self, doc: &T) -> Result<(), JournalError> {
        if !self.options.enabled {
            return Ok(());
        }
        let _guard = self.lock.lock().await;

        self.rollover_if_needed_locked().await?;

        let path = &self.options.file_path;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| JournalError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| JournalError::io(path, e))?;
        debug!(path = %path.display(), "Journal written");
        Ok(())
    }

    /// Archive the document if it exceeds the size or age limit. Returns
    /// whether a rollover happened.
    pub async fn rollover_if_needed(&self) -> Result<bool, JournalError> {
        if !self.options.enabled {
            return Ok(false);
        }
        let _guard = self.lock.lock().await;
        self.rollover_if_needed_locked().await
    }

    /// Unconditionally archive the current document and recreate an empty
    /// one.
    pub async fn force_rollover(&self) -> Result<(), JournalError> {
        if !self.options.enabled {
            return Ok(());
        }
        let _guard = self.lock.lock().await;
        self.rotate_locked().await
    }

    // -- internals (all called with the lock held) ---------------------------

    async fn read_locked<T: DeserializeOwned>(&self) -> Result<Option<T>, JournalError> {
        let path = &self.options.file_path;
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(JournalError::io(path, e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn rollover_if_needed_locked(&self) -> Result<bool, JournalError> {
        let path = &self.options.file_path;
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(JournalError::io(path, e)),
        };

        let too_big = metadata.len() > self.options.max_file_size;
        // Birth time where the filesystem records it, mtime otherwise.
        let age = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .and_then(|t| t.elapsed().ok());
        let too_old = age.is_some_and(|a| a > self.options.max_file_age());

        if !too_big && !too_old {
            return Ok(false);
        }
        self.rotate_locked().await?;
        Ok(true)
    }

    async fn rotate_locked(&self) -> Result<(), JournalError> {
        let path = &self.options.file_path;

        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| JournalError::io(path, e))?;
        if exists {
            let archived = self.archive_path().await?;
            tokio::fs::rename(path, &archived)
                .await
                .map_err(|e| JournalError::io(path, e))?;
            info!(
                from = %path.display(),
                to = %archived.display(),
                "Journal rolled over"
            );
        }
        self.create_empty_locked().await
    }

    /// Archive destination: `<stem>_YYYYMMDD_HHMMSS<ext>` in the rollover
    /// directory, using local time so operators browsing the directory see
    /// familiar timestamps. A numeric suffix disambiguates rollovers that
    /// land within the same second.
    async fn archive_path(&self) -> Result<PathBuf, JournalError> {
        let dir = &self.options.rollover_directory;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| JournalError::io(dir, e))?;

        let path = &self.options.file_path;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("journal");
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
        let stamp = Local::now().format("%Y%m%d_%H%M%S");

        let mut candidate = dir.join(format!("{stem}_{stamp}.{ext}"));
        let mut counter = 1;
        while tokio::fs::try_exists(&candidate)
            .await
            .map_err(|e| JournalError::io(&candidate, e))?
        {
            candidate = dir.join(format!("{stem}_{stamp}_{counter}.{ext}"));
            counter += 1;
        }
        Ok(candidate)
    }

    async fn create_empty_locked(&self) -> Result<(), JournalError> {
        let path = &self.options.file_path;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| JournalError::io(parent, e))?;
        }
        tokio::fs::write(path, "")
            .await
            .map_err(|e| JournalError::io(path, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
