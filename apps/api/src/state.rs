use std::sync::Arc;

use crate::config::Config;
use crate::render::{RenderError, TemplateRegistry};
use crate::wizard::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled templates; read-only after startup.
    pub templates: Arc<TemplateRegistry>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, RenderError> {
        let templates = TemplateRegistry::new(config.default_template)?;
        Ok(AppState {
            config,
            templates: Arc::new(templates),
            sessions: SessionStore::new(),
        })
    }
}
