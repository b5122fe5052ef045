use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId};
use crate::error::StoreError;

/// Durable post storage.
///
/// Every call is atomic from the caller's point of view: it either commits a
/// complete new snapshot or leaves the previous one in place.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post under the next free id.
    async fn create(&self, new: NewPost) -> Result<Post, StoreError>;

    /// All posts in insertion order.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;

    /// Up to `limit` posts, most recently modified first.
    async fn recent(&self, limit: usize) -> Result<Vec<Post>, StoreError>;

    async fn get(&self, id: PostId) -> Result<Post, StoreError>;

    /// Replace title and description, and the banner when one is given.
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, StoreError>;

    /// Remove a post and, best-effort, its banner asset.
    async fn delete(&self, id: PostId) -> Result<Post, StoreError>;
}
