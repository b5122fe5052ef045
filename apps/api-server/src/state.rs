//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{AssetStore, PostRepository};
use folio_infra::{AllowedTypes, InMemoryAssetStore, JsonPostStore, LocalAssetStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub assets: Arc<dyn AssetStore>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        let allowed = AllowedTypes::new(&config.allowed_banner_types);
        let assets: Arc<dyn AssetStore> = match std::fs::create_dir_all(&config.uploads_dir) {
            Ok(()) => {
                tracing::info!(dir = %config.uploads_dir.display(), "Storing banners on disk");
                Arc::new(LocalAssetStore::new(&config.uploads_dir, allowed))
            }
            Err(e) => {
                tracing::error!(
                    "Uploads directory {} unavailable: {}. Using in-memory fallback.",
                    config.uploads_dir.display(),
                    e
                );
                Arc::new(InMemoryAssetStore::with_allowed(allowed))
            }
        };

        let posts = Arc::new(JsonPostStore::with_options(
            &config.data_file,
            assets.clone(),
            config.store.clone(),
        ));

        tracing::info!(
            data_file = %config.data_file.display(),
            load_policy = ?config.store.load_policy,
            "Application state initialized"
        );

        Self::from_parts(posts, assets)
    }

    pub fn from_parts(posts: Arc<dyn PostRepository>, assets: Arc<dyn AssetStore>) -> Self {
        Self { posts, assets }
    }
}
