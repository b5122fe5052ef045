//! HTTP handlers and route configuration.

mod banners;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .route("/banners", web::post().to(banners::upload)),
    );
}
