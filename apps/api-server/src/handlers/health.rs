//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Whether the post file could be loaded.
    pub storage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<usize>,
}

/// Health check endpoint - returns server and storage status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (status, storage, posts) = match state.posts.list().await {
        Ok(posts) => ("ok", "ok", Some(posts.len())),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not load posts");
            ("degraded", "unavailable", None)
        }
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        storage,
        posts,
    };

    if storage == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
