//! Post repository backed by a single JSON file.
//!
//! Every operation reads the whole file, applies its change in memory and
//! writes the whole file back. Writers are serialized by one mutex; saves go
//! through a temporary sibling file and an atomic rename, so readers never
//! see a half-written snapshot and a crash leaves either the old or the new
//! file in place.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use folio_core::domain::{Collection, NewPost, Post, PostChanges, PostId};
use folio_core::ports::{AssetStore, PostRepository};
use folio_core::{AssetError, StoreError};

/// What to do when the post file exists but cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log a warning and start from an empty collection.
    #[default]
    Recover,
    /// Report a persistence failure to the caller.
    FailFast,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recover" => Ok(LoadPolicy::Recover),
            "fail-fast" | "fail_fast" | "failfast" => Ok(LoadPolicy::FailFast),
            other => Err(format!("unknown load policy: {}", other)),
        }
    }
}

/// JSON store configuration.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub load_policy: LoadPolicy,
    /// Delete the previous banner when an update swaps it for a new one.
    pub prune_replaced_banners: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            load_policy: LoadPolicy::Recover,
            prune_replaced_banners: true,
        }
    }
}

/// File-backed post repository.
pub struct JsonPostStore {
    path: PathBuf,
    options: StoreOptions,
    assets: Arc<dyn AssetStore>,
    /// Held for the whole load-mutate-save sequence of every write.
    write_lock: Mutex<()>,
}

impl JsonPostStore {
    pub fn new(path: impl Into<PathBuf>, assets: Arc<dyn AssetStore>) -> Self {
        Self::with_options(path, assets, StoreOptions::default())
    }

    pub fn with_options(
        path: impl Into<PathBuf>,
        assets: Arc<dyn AssetStore>,
        options: StoreOptions,
    ) -> Self {
        Self {
            path: path.into(),
            options,
            assets,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "posts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the current snapshot from disk.
    ///
    /// A missing file is a fresh store. An unreadable one is handled
    /// according to [`LoadPolicy`]; when the file parsed, the id counter
    /// survives the fallback so no id is handed out twice.
    pub async fn load(&self) -> Result<Collection, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No post file yet, starting empty");
                return Ok(Collection::new());
            }
            Err(e) => return self.recover(format!("read failed: {}", e), 0),
        };

        let mut collection: Collection = match serde_json::from_slice(&bytes) {
            Ok(collection) => collection,
            Err(e) => return self.recover(format!("parse failed: {}", e), 0),
        };

        match collection.repair() {
            Ok(true) => tracing::warn!(
                path = %self.path.display(),
                last_id = collection.last_id(),
                "Post id counter was behind the highest id, raised it"
            ),
            Ok(false) => {}
            // the ids are unusable but the counter still bounds every id ever issued
            Err(reason) => return self.recover(reason, collection.high_water_mark()),
        }

        Ok(collection)
    }

    fn recover(&self, reason: String, last_id: u64) -> Result<Collection, StoreError> {
        match self.options.load_policy {
            LoadPolicy::Recover => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    last_id,
                    "Post file unusable, falling back to an empty collection"
                );
                Ok(Collection::starting_after(last_id))
            }
            LoadPolicy::FailFast => {
                tracing::error!(path = %self.path.display(), %reason, "Post file unusable");
                Err(StoreError::Persistence(format!(
                    "{}: {}",
                    self.path.display(),
                    reason
                )))
            }
        }
    }

    /// Durably replace the post file with `collection`.
    pub async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(collection)
            .map_err(|e| StoreError::persistence("serialize posts", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::persistence("create data directory", e))?;
        }

        let tmp = self.temp_path();
        if let Err(e) = write_synced(&tmp, &json).await {
            let _ = fs::remove_file(&tmp).await;
            tracing::error!(path = %tmp.display(), error = %e, "Writing post snapshot failed");
            return Err(StoreError::persistence("write post snapshot", e));
        }

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            tracing::error!(path = %self.path.display(), error = %e, "Replacing post file failed");
            return Err(StoreError::persistence("replace post file", e));
        }

        sync_parent_dir(&self.path).await;
        Ok(())
    }

    async fn discard_asset(&self, post_id: PostId, name: &str) {
        match self.assets.remove(name).await {
            Ok(()) => tracing::debug!(%post_id, banner = %name, "Banner deleted"),
            Err(AssetError::NotFound(_)) => {
                tracing::warn!(%post_id, banner = %name, "Banner was already missing")
            }
            Err(e) => tracing::warn!(%post_id, banner = %name, error = %e, "Banner cleanup failed"),
        }
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Persist the rename itself. Failure here does not undo the commit.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let result = match fs::File::open(parent).await {
        Ok(dir) => dir.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::debug!(dir = %parent.display(), error = %e, "Directory sync failed");
    }
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) {}

#[async_trait]
impl PostRepository for JsonPostStore {
    async fn create(&self, new: NewPost) -> Result<Post, StoreError> {
        new.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await?;
        let post = collection.insert(new, Utc::now())?;
        self.save(&collection).await?;

        tracing::info!(post_id = %post.id, title = %post.title, "Post created");
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.load().await?.into_posts())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        Ok(self.load().await?.recent(limit))
    }

    async fn get(&self, id: PostId) -> Result<Post, StoreError> {
        let collection = self.load().await?;
        collection.get(id).cloned()
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, StoreError> {
        let updated = {
            let _guard = self.write_lock.lock().await;
            let mut collection = self.load().await?;
            let updated = collection.update(id, changes, Utc::now())?;
            self.save(&collection).await?;
            updated
        };

        tracing::info!(post_id = %id, "Post updated");

        if let Some(old) = updated.replaced_banner.as_deref() {
            if self.options.prune_replaced_banners {
                self.discard_asset(id, old).await;
            } else {
                tracing::debug!(post_id = %id, banner = %old, "Keeping replaced banner");
            }
        }

        Ok(updated.post)
    }

    async fn delete(&self, id: PostId) -> Result<Post, StoreError> {
        let removed = {
            let _guard = self.write_lock.lock().await;
            let mut collection = self.load().await?;
            let removed = collection.remove(id)?;
            self.save(&collection).await?;
            removed
        };

        tracing::info!(post_id = %id, "Post deleted");

        if removed.has_banner() {
            self.discard_asset(id, &removed.banner).await;
        }

        Ok(removed)
    }
}
