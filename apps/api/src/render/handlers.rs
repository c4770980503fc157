//! Axum route handlers for the Template API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::render::registry::TemplateInfo;
use crate::render::{render_preview, Fragment};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: state.templates.list(),
    })
}

/// GET /api/v1/templates/:id/preview
///
/// Renders placeholder data so the picker can show what a template looks like.
pub async fn handle_template_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Fragment>, AppError> {
    let fragment = render_preview(&state.templates, Some(&id))?;
    Ok(Json(fragment))
}
