//! Axum route handlers for the Wizard API.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::BytesMut;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::fields::RawForm;
use crate::models::image::{check_size, ProfileImage};
use crate::state::AppState;
use crate::wizard::machine::TransitionError;
use crate::wizard::session::SessionView;

/// Multipart part carrying the profile picture.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Deserialize)]
pub struct SelectTemplateRequest {
    pub template: String,
}

/// POST /api/v1/wizard
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let view = state
        .sessions
        .create(state.templates.default_template())
        .await;
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/wizard/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(id).await?))
}

/// DELETE /api/v1/wizard/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/wizard/:id/fields
pub async fn handle_update_fields(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<RawForm>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| s.update_fields(fields).map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/wizard/:id/template
///
/// Unknown identifiers select the default template rather than failing.
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectTemplateRequest>,
) -> Result<Json<SessionView>, AppError> {
    let template = state.templates.resolve(Some(&request.template));
    let view = state
        .sessions
        .with_session(id, |s| s.select_template(template).map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/wizard/:id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| s.next().map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/wizard/:id/previous
pub async fn handle_previous(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| s.previous().map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/wizard/:id/skip-experience
pub async fn handle_skip_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| s.skip_experience().map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/wizard/:id/generate
///
/// Validates, renders with the session's template and enters preview. The
/// fragment is returned inside the session view.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.generate(&state.templates)?;
            Ok::<_, TransitionError>(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/wizard/:id/edit
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| s.edit().map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/wizard/:id/image
///
/// Multipart upload with an `image` part. The ticket is taken before the body
/// is read, so if another upload starts meanwhile this one is discarded with
/// 409 instead of overwriting the newer selection.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let ticket = state
        .sessions
        .with_session(id, |s| s.begin_image_upload())
        .await?;

    let image = read_image(&mut multipart, state.config.max_image_bytes).await?;
    info!(
        "Session {id}: received {} profile image ({} bytes)",
        image.mime(),
        image.len()
    );

    let view = state
        .sessions
        .with_session(id, |s| s.complete_image_upload(ticket, image).map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/wizard/:id/image
pub async fn handle_remove_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| s.remove_image().map(|_| s.view()))
        .await?;
    Ok(Json(view))
}

async fn read_image(multipart: &mut Multipart, limit: usize) -> Result<ProfileImage, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some(IMAGE_FIELD) {
            return read_image_field(field, limit).await;
        }
    }
    Err(AppError::Validation(format!(
        "Multipart body must include an '{IMAGE_FIELD}' part"
    )))
}

/// Streams one part, rejecting it as soon as it grows past `limit`.
async fn read_image_field(mut field: Field<'_>, limit: usize) -> Result<ProfileImage, AppError> {
    let mime = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation("Image part is missing a content type".to_string()))?;

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
        check_size(buf.len() + chunk.len(), limit)?;
        buf.extend_from_slice(&chunk);
    }

    Ok(ProfileImage::new(&mime, buf.freeze())?)
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}
