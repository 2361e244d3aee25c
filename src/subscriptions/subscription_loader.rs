//! Subscription persistence layer.
//!
//! This module provides the [`SubscriptionLoader`] for reading and writing the
//! subscriptions document. The whole collection is serialized as one pretty
//! printed JSON array and rewritten on every mutation.

use std::{
    collections::HashSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use tokio::{fs, io::AsyncWriteExt};

use crate::subscriptions::{StoreError, subscription::Subscription};

/// Loads and persists the subscriptions document.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves either the old or the new document on
/// disk, never a truncated one.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), StoreError> {
/// let loader = SubscriptionLoader::new("subscriptions.json");
/// let subscriptions = loader.load().await?;
/// loader.persist(&subscriptions).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SubscriptionLoader {
    /// Path to the JSON document.
    path: PathBuf,
}

impl SubscriptionLoader {
    /// Creates a loader for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SubscriptionLoader { path: path.into() }
    }

    /// Loads the subscriptions from disk.
    ///
    /// # Errors
    ///
    /// - A missing file is not an error: an empty collection is returned.
    /// - An unreadable or malformed file returns [`StoreError::Load`]; the
    ///   caller must not start with an empty collection in that case, or the
    ///   next write would discard the data on disk.
    /// - A document holding two subscriptions of the same user to the same
    ///   game is malformed.
    pub async fn load(&self) -> Result<Vec<Subscription>, StoreError> {
        let serialized = match fs::read_to_string(&self.path).await {
            Ok(serialized) => serialized,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "no persisted subscriptions found at {}, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::Load(e.to_string())),
        };

        let subscriptions: Vec<Subscription> =
            serde_json::from_str(&serialized).map_err(|e| StoreError::Load(e.to_string()))?;

        let mut seen = HashSet::new();
        for subscription in &subscriptions {
            if !seen.insert((subscription.user_id.as_str(), subscription.game.as_str())) {
                return Err(StoreError::Load(format!(
                    "duplicate subscription of user {} to {}",
                    subscription.user_id, subscription.game
                )));
            }
        }

        info!(
            "loaded {} persisted subscriptions from {}",
            subscriptions.len(),
            self.path.display()
        );

        Ok(subscriptions)
    }

    /// Persists the full collection, replacing the previous document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if serialization, the temporary
    /// write or the rename fails. The previous document is left untouched.
    pub async fn persist(&self, subscriptions: &[Subscription]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(subscriptions)
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        let temp_path = self.temp_path();
        let written = match write_synced(&temp_path, serialized.as_bytes()).await {
            Ok(()) => fs::rename(&temp_path, &self.path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            // Best effort, the target is still the previous document
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::Persistence(e.to_string()));
        }

        debug!(
            "persisted {} subscriptions to {}",
            subscriptions.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Sibling path used for the write-then-rename.
    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

/// Writes `bytes` to a fresh file at `path` and flushes it to the disk.
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
