//! Banner asset stores - local filesystem and in-memory fallback.

mod local;
mod memory;

pub use local::LocalAssetStore;
pub use memory::InMemoryAssetStore;

use chrono::Utc;
use uuid::Uuid;

use folio_core::AssetError;
use folio_core::ports::{DEFAULT_BANNER_TYPES, extension_for};

/// Content types an asset store accepts.
#[derive(Debug, Clone)]
pub struct AllowedTypes(Vec<String>);

impl AllowedTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            types
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Check a `Content-Type` value, ignoring parameters such as `charset`.
    /// Returns the bare, lowercased media type.
    pub fn check(&self, content_type: &str) -> Result<String, AssetError> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if self.0.iter().any(|t| *t == media_type) {
            Ok(media_type)
        } else {
            Err(AssetError::UnsupportedType(content_type.to_string()))
        }
    }
}

impl Default for AllowedTypes {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_TYPES)
    }
}

/// Unique banner filename: `banner-<unix millis>-<uuid>[.ext]`.
fn generate_name(media_type: &str) -> String {
    let stem = format!(
        "banner-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    );
    match extension_for(media_type) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_types_ignore_parameters_and_case() {
        let allowed = AllowedTypes::default();
        assert_eq!(allowed.check("image/PNG").unwrap(), "image/png");
        assert_eq!(allowed.check("image/jpeg; q=0.9").unwrap(), "image/jpeg");
        assert!(matches!(
            allowed.check("text/html"),
            Err(AssetError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_generated_names_are_unique() {
        let a = generate_name("image/png");
        let b = generate_name("image/png");
        assert_ne!(a, b);
        assert!(a.starts_with("banner-"));
        assert!(a.ends_with(".png"));
        assert!(folio_core::ports::validate_asset_name(&a).is_ok());
    }
}
