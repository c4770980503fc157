pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::form::handlers as form_handlers;
use crate::render::handlers as template_handlers;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

/// Headroom for multipart framing and the JSON around an embedded image.
const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let max_image = state.config.max_image_bytes;
    // Base64 inflates by 4/3; oversized images must reach our own size check
    // before axum's body limit cuts them off.
    let json_limit = (max_image / 3)
        .saturating_mul(4)
        .saturating_add(BODY_OVERHEAD_BYTES);
    let upload_limit = max_image.saturating_add(BODY_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Templates
        .route("/api/v1/templates", get(template_handlers::handle_list_templates))
        .route(
            "/api/v1/templates/:id/preview",
            get(template_handlers::handle_template_preview),
        )
        // Stateless form API
        .route("/api/v1/cv/validate", post(form_handlers::handle_validate))
        .route(
            "/api/v1/cv/render",
            post(form_handlers::handle_render).layer(DefaultBodyLimit::max(json_limit)),
        )
        // Wizard API
        .route("/api/v1/wizard", post(wizard::handle_create_session))
        .route(
            "/api/v1/wizard/:id",
            get(wizard::handle_get_session).delete(wizard::handle_delete_session),
        )
        .route("/api/v1/wizard/:id/fields", patch(wizard::handle_update_fields))
        .route("/api/v1/wizard/:id/template", put(wizard::handle_select_template))
        .route("/api/v1/wizard/:id/next", post(wizard::handle_next))
        .route("/api/v1/wizard/:id/previous", post(wizard::handle_previous))
        .route(
            "/api/v1/wizard/:id/skip-experience",
            post(wizard::handle_skip_experience),
        )
        .route("/api/v1/wizard/:id/generate", post(wizard::handle_generate))
        .route("/api/v1/wizard/:id/edit", post(wizard::handle_edit))
        .route(
            "/api/v1/wizard/:id/image",
            put(wizard::handle_upload_image)
                .delete(wizard::handle_remove_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
