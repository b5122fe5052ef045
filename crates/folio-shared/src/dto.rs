//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to publish a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Filename returned by the banner upload endpoint.
    #[serde(default)]
    pub banner: String,
}

/// Request to edit a post. Omitting `banner` keeps the current one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub banner: String,
    /// RFC 3339 timestamp of the last modification.
    pub date: String,
}

/// Query parameters for listing posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    /// Return only the N most recently modified posts.
    pub recent: Option<usize>,
}

/// Response to a banner upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerResponse {
    pub banner: String,
}
