//! Axum route handlers for stateless validation and rendering.
//!
//! These take a complete form in one request; the wizard endpoints cover the
//! step-by-step flow.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::form::collector::collect;
use crate::form::fields::{RawForm, Section};
use crate::form::validation::{validate_form, validate_section, SectionValidation};
use crate::models::image::ProfileImage;
use crate::render::{render, Fragment};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub form: RawForm,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub passed: bool,
    pub errors: Vec<String>,
    pub sections: Vec<SectionValidation>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub form: RawForm,
    pub template: Option<String>,
    /// `data:<mime>;base64,...`
    pub profile_image: Option<String>,
}

/// POST /api/v1/cv/validate
pub async fn handle_validate(Json(request): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let errors = validate_form(&request.form);
    let sections = Section::ALL
        .iter()
        .map(|s| validate_section(*s, &request.form))
        .collect();

    Json(ValidateResponse {
        passed: errors.is_empty(),
        errors,
        sections,
    })
}

/// POST /api/v1/cv/render
///
/// Validates the whole form, builds the document and renders it with the
/// requested template (or the default).
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<Fragment>, AppError> {
    let errors = validate_form(&request.form);
    if !errors.is_empty() {
        return Err(AppError::ValidationFailed(errors.into()));
    }

    let profile_image = request
        .profile_image
        .as_deref()
        .filter(|uri| !uri.trim().is_empty())
        .map(ProfileImage::from_data_uri)
        .transpose()?;
    if let Some(image) = &profile_image {
        image.ensure_within(state.config.max_image_bytes)?;
    }

    let document = collect(&request.form, profile_image);
    let fragment = render(&state.templates, request.template.as_deref(), &document)?;
    Ok(Json(fragment))
}
