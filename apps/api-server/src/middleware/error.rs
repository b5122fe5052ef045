//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use folio_core::{AssetError, StoreError};
use folio_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    UnsupportedMediaType(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::UnsupportedMediaType(detail) => ErrorResponse::unsupported_media_type(detail),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => AppError::NotFound(format!("Post {} not found", id)),
            StoreError::InvalidArgument(msg) => AppError::BadRequest(msg),
            StoreError::Persistence(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::NotFound(name) => AppError::NotFound(format!("Banner {} not found", name)),
            AssetError::InvalidName(_) | AssetError::Empty => AppError::BadRequest(err.to_string()),
            AssetError::UnsupportedType(_) => AppError::UnsupportedMediaType(err.to_string()),
            AssetError::Io(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::domain::PostId;

    #[test]
    fn test_store_errors_map_to_status() {
        let not_found: AppError = StoreError::NotFound {
            id: PostId::new(3).unwrap(),
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: AppError = StoreError::InvalidArgument("bad id".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let failed: AppError = StoreError::Persistence("disk full".into()).into();
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_asset_errors_map_to_status() {
        let unsupported: AppError = AssetError::UnsupportedType("text/plain".into()).into();
        assert_eq!(unsupported.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let empty: AppError = AssetError::Empty.into();
        assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);
    }
}
