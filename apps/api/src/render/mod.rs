// Document rendering: template registry, the shared view model every template
// consumes, and the renderer that ties a CvDocument to a chosen template.
// Rendering is synchronous and pure; it never touches session state.

pub mod dates;
pub mod handlers;
pub mod registry;
pub mod renderer;
pub mod samples;
pub mod view;

pub use registry::{TemplateId, TemplateRegistry};
pub use renderer::{render, render_preview, Fragment, RenderError};
