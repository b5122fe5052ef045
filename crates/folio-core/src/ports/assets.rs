use async_trait::async_trait;

use crate::error::AssetError;

/// Asset store trait - where banner images live, addressed by filename.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store an uploaded payload and return the generated filename.
    async fn put(&self, content_type: &str, bytes: &[u8]) -> Result<String, AssetError>;

    /// Delete an asset by name.
    async fn remove(&self, name: &str) -> Result<(), AssetError>;

    /// Check if an asset exists.
    async fn exists(&self, name: &str) -> bool;
}

/// Reject anything that is not a plain filename.
pub fn validate_asset_name(name: &str) -> Result<(), AssetError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if bad {
        return Err(AssetError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Map an allowed image content type to a file extension.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Content types accepted for banners unless configured otherwise.
pub const DEFAULT_BANNER_TYPES: [&str; 3] = ["image/png", "image/gif", "image/jpeg"];
