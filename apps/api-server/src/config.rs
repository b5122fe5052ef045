//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use folio_core::ports::DEFAULT_BANNER_TYPES;
use folio_infra::{LoadPolicy, StoreOptions};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// The JSON file holding every post.
    pub data_file: PathBuf,
    /// Directory banner images are written to.
    pub uploads_dir: PathBuf,
    pub allowed_banner_types: Vec<String>,
    /// Largest accepted banner upload, in bytes.
    pub max_banner_bytes: usize,
    pub store: StoreOptions,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let allowed_banner_types = env::var("FOLIO_ALLOWED_BANNER_TYPES")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|types| !types.is_empty())
            .unwrap_or_else(|| DEFAULT_BANNER_TYPES.iter().map(|t| t.to_string()).collect());

        let load_policy = match env::var("FOLIO_LOAD_POLICY") {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!("{}. Falling back to recover.", e);
                LoadPolicy::Recover
            }),
            Err(_) => LoadPolicy::Recover,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5500),
            data_file: env::var("FOLIO_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/posts.json")),
            uploads_dir: env::var("FOLIO_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/uploads")),
            allowed_banner_types,
            max_banner_bytes: env::var("FOLIO_MAX_BANNER_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
            store: StoreOptions {
                load_policy,
                prune_replaced_banners: env::var("FOLIO_PRUNE_REPLACED_BANNERS")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            },
        }
    }
}
