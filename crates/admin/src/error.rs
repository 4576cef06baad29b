//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use homare_core::{GidError, TemplateError};

use crate::openai::OpenAiError;
use crate::shopify::AdminShopifyError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// `OpenAI` API operation failed.
    #[error("OpenAI error: {0}")]
    OpenAi(#[from] OpenAiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GidError> for AppError {
    fn from(err: GidError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    fn capture(&self) {
        if matches!(
            self,
            Self::Internal(_) | Self::Shopify(_) | Self::OpenAi(_)
        ) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(_) | Self::OpenAi(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.capture();

        // Don't expose internal error details to clients. Shopify errors are
        // shown as-is; only operators on the private network see them.
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(e) => format!("External service error: {e}"),
            Self::OpenAi(_) => "Text generation service error".to_string(),
            _ => self.to_string(),
        };

        (self.status(), message).into_response()
    }
}

/// Failure of the single-product save endpoint.
///
/// Answers `{"success": false, "error": ...}` with 400 for malformed input and
/// 500 for everything else, so the editor can show the message.
#[derive(Debug)]
pub struct SaveError(pub AppError);

impl<E: Into<AppError>> From<E> for SaveError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for SaveError {
    fn into_response(self) -> Response {
        self.0.capture();

        let status = match self.0 {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("gid://shopify/Product/1".to_string());
        assert_eq!(err.to_string(), "Not found: gid://shopify/Product/1");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Shopify(AdminShopifyError::RateLimited(5))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_shopify_error_body_carries_upstream_message() {
        let response = AppError::Shopify(AdminShopifyError::MissingField("products")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "External service error: Response missing field: products"
        );
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = AppError::Internal("template render failed".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), "Internal server error");
    }

    #[test]
    fn test_template_error_is_bad_request() {
        let err: AppError = "shein".parse::<homare_core::RewriteTemplate>().unwrap_err().into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_save_error_is_500() {
        let response = SaveError(AppError::Shopify(AdminShopifyError::Unauthorized(
            "bad token".to_string(),
        )))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = SaveError(AppError::BadRequest("bad id".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
