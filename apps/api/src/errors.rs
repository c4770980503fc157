use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::form::validation::{FieldRef, SectionValidation};
use crate::models::image::ImageError;
use crate::render::RenderError;
use crate::wizard::machine::TransitionError;
use crate::wizard::session::Superseded;

/// Shown for any failure while building the fragment; the user can retry.
pub const RENDER_RETRY_MESSAGE: &str = "There was an error generating your CV. Please try again.";

/// User-correctable problems, surfaced verbatim as one consolidated message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationDetails {
    pub errors: Vec<String>,
    pub invalid_fields: Vec<FieldRef>,
}

impl From<SectionValidation> for ValidationDetails {
    fn from(v: SectionValidation) -> Self {
        Self {
            errors: v.errors,
            invalid_fields: v.invalid_fields,
        }
    }
}

impl From<Vec<String>> for ValidationDetails {
    fn from(errors: Vec<String>) -> Self {
        Self {
            errors,
            invalid_fields: vec![],
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed: {}", .0.errors.join("; "))]
    ValidationFailed(ValidationDetails),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ImageError> for AppError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::TooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            _ => AppError::Validation(e.to_string()),
        }
    }
}

impl From<Superseded> for AppError {
    fn from(e: Superseded) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::NotAllowed { .. } => AppError::Conflict(e.to_string()),
            TransitionError::SectionIncomplete(v) => AppError::ValidationFailed(v.into()),
            TransitionError::Invalid(errors) => AppError::ValidationFailed(errors.into()),
            TransitionError::Render(e) => AppError::Render(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::ValidationFailed(details) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!(
                    "Please correct the following errors:\n\n{}",
                    details.errors.join("\n")
                ),
                Some(json!(details)),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
                None,
            ),
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    RENDER_RETRY_MESSAGE.to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_image_maps_to_413() {
        let err: AppError = ImageError::TooLarge {
            size: 6 * 1024 * 1024,
            limit_mb: 5,
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_bad_image_type_maps_to_400() {
        let err: AppError = ImageError::UnsupportedType("text/plain".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_failed_maps_to_400() {
        let err = AppError::ValidationFailed(vec!["Please enter a valid email address".to_string()].into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_superseded_upload_maps_to_409() {
        let err: AppError = Superseded.into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
