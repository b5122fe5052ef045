//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Post not found: {id}")]
    NotFound { id: PostId },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn persistence(context: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Persistence(format!("{}: {}", context, err))
    }
}

/// Asset store errors.
///
/// When raised while cleaning up after a committed record change these are
/// only logged, never returned to the caller.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Invalid asset name: {0:?}")]
    InvalidName(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Asset payload is empty")]
    Empty,

    #[error("Asset I/O failed: {0}")]
    Io(String),
}
