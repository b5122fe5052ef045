//! Banner upload handler.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use folio_shared::dto::BannerResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/banners
///
/// The raw request body is the image; `Content-Type` must be an allowed
/// image type. Responds with the filename to reference from a post.
pub async fn upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::UnsupportedMediaType("missing Content-Type".to_string()))?;

    let banner = state.assets.put(content_type, &body).await?;
    tracing::info!(banner = %banner, size = body.len(), "Banner uploaded");

    Ok(HttpResponse::Created().json(BannerResponse { banner }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use folio_core::ports::AssetStore;
    use folio_infra::{InMemoryAssetStore, JsonPostStore};
    use serde_json::Value;

    use super::*;
    use crate::handlers::configure_routes;

    #[actix_web::test]
    async fn test_upload_checks_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let assets = Arc::new(InMemoryAssetStore::new());
        let posts = Arc::new(JsonPostStore::new(
            dir.path().join("posts.json"),
            assets.clone() as Arc<dyn AssetStore>,
        ));
        let state = AppState::from_parts(posts, assets.clone());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/banners")
            .insert_header((header::CONTENT_TYPE, "text/html"))
            .set_payload("<html></html>")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let req = test::TestRequest::post()
            .uri("/api/banners")
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .set_payload(&b"\x89PNG\r\n"[..])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let name = body["banner"].as_str().unwrap();
        assert!(assets.exists(name).await);
    }
}
