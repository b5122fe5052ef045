//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`:
//! the JSON file post store and the banner asset stores.

pub mod assets;
pub mod store;

pub use assets::{AllowedTypes, InMemoryAssetStore, LocalAssetStore};
pub use store::{JsonPostStore, LoadPolicy, StoreOptions};
