//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod assets;
mod repository;

pub use assets::{AssetStore, DEFAULT_BANNER_TYPES, extension_for, validate_asset_name};
pub use repository::PostRepository;
