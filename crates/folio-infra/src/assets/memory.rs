//! In-memory asset store - used when no uploads directory is available.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::AssetError;
use folio_core::ports::{AssetStore, validate_asset_name};

use super::{AllowedTypes, generate_name};

/// In-memory asset store using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryAssetStore {
    assets: RwLock<HashMap<String, Vec<u8>>>,
    allowed: AllowedTypes,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::with_allowed(AllowedTypes::default())
    }

    pub fn with_allowed(allowed: AllowedTypes) -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
            allowed,
        }
    }

    /// Place an asset under a fixed name, bypassing content-type checks.
    pub async fn insert(&self, name: &str, bytes: &[u8]) -> Result<(), AssetError> {
        validate_asset_name(name)?;
        self.assets
            .write()
            .await
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

impl Default for InMemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn put(&self, content_type: &str, bytes: &[u8]) -> Result<String, AssetError> {
        let media_type = self.allowed.check(content_type)?;
        if bytes.is_empty() {
            return Err(AssetError::Empty);
        }

        let name = generate_name(&media_type);
        self.assets
            .write()
            .await
            .insert(name.clone(), bytes.to_vec());
        Ok(name)
    }

    async fn remove(&self, name: &str) -> Result<(), AssetError> {
        validate_asset_name(name)?;
        match self.assets.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(AssetError::NotFound(name.to_string())),
        }
    }

    async fn exists(&self, name: &str) -> bool {
        self.assets.read().await.contains_key(name)
    }
}
