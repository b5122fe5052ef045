//! Filesystem asset store - banners live as plain files in one directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use folio_core::AssetError;
use folio_core::ports::{AssetStore, validate_asset_name};

use super::{AllowedTypes, generate_name};

/// Asset store rooted at the uploads directory.
pub struct LocalAssetStore {
    root: PathBuf,
    allowed: AllowedTypes,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, allowed: AllowedTypes) -> Self {
        Self {
            root: root.into(),
            allowed,
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        validate_asset_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn put(&self, content_type: &str, bytes: &[u8]) -> Result<String, AssetError> {
        let media_type = self.allowed.check(content_type)?;
        if bytes.is_empty() {
            return Err(AssetError::Empty);
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;

        let name = generate_name(&media_type);
        let path = self.root.join(&name);

        // create_new: never clobber an existing banner
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;
        let written = async {
            file.write_all(bytes).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(AssetError::Io(e.to_string()));
        }

        tracing::debug!(banner = %name, size = bytes.len(), "Banner stored");
        Ok(name)
    }

    async fn remove(&self, name: &str) -> Result<(), AssetError> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(name.to_string()))
            }
            Err(e) => Err(AssetError::Io(e.to_string())),
        }
    }

    async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path().join("uploads"), AllowedTypes::default());

        let name = store.put("image/png", b"\x89PNG fake").await.unwrap();
        assert!(store.exists(&name).await);
        assert!(dir.path().join("uploads").join(&name).is_file());

        store.remove(&name).await.unwrap();
        assert!(!store.exists(&name).await);
        assert!(matches!(
            store.remove(&name).await,
            Err(AssetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_disallowed_and_empty_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), AllowedTypes::default());

        assert!(matches!(
            store.put("application/pdf", b"%PDF").await,
            Err(AssetError::UnsupportedType(_))
        ));
        assert!(matches!(
            store.put("image/gif", b"").await,
            Err(AssetError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"keep").unwrap();

        let store = LocalAssetStore::new(&root, AllowedTypes::default());

        assert!(matches!(
            store.remove("../secret.txt").await,
            Err(AssetError::InvalidName(_))
        ));
        assert!(!store.exists("../secret.txt").await);
        assert!(dir.path().join("secret.txt").exists());
    }
}
