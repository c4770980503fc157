//! Picks a template and turns a [`CvDocument`] into an
//! HTML fragment for the preview surface.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::models::cv::CvDocument;
use crate::render::registry::{TemplateId, TemplateRegistry};
use crate::render::samples::sample_document;
use crate::render::view::DocumentView;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template '{template}' failed to compile: {source}")]
    Compile {
        template: TemplateId,
        source: Box<handlebars::TemplateError>,
    },

    #[error("Template '{template}' failed to render: {source}")]
    Template {
        template: TemplateId,
        source: Box<handlebars::RenderError>,
    },
}

/// A self-contained markup snippet, not a full HTML document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub template: TemplateId,
    pub html: String,
}

/// Renders `doc` with the template named by `template`, falling back to the
/// registry default for missing or unknown names.
///
/// Pure: the same document and template always yield the same fragment.
pub fn render(
    registry: &TemplateRegistry,
    template: Option<&str>,
    doc: &CvDocument,
) -> Result<Fragment, RenderError> {
    let template = registry.resolve(template);
    let view = DocumentView::from(doc);

    let html = registry.render_view(template, &view).map_err(|e| {
        error!("CV generation failed: {e}");
        e
    })?;

    info!(
        "Rendered CV with '{}' template ({} education, {} experience, {} skill groups)",
        template,
        doc.education.len(),
        doc.experience.len(),
        doc.skills.len()
    );

    Ok(Fragment { template, html })
}

/// Renders the built-in sample CV so a template can be previewed before the
/// form is filled in.
pub fn render_preview(
    registry: &TemplateRegistry,
    template: Option<&str>,
) -> Result<Fragment, RenderError> {
    render(registry, template, &sample_document())
}
