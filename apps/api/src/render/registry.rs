//! Template registry: the closed set of visual variants a CV can be rendered with.
//!
//! Each variant is a Handlebars template compiled once at startup. Every
//! template consumes the same [`DocumentView`], so switching variants changes
//! markup and section order but never the data shown.

use std::fmt;
use std::str::FromStr;

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::render::renderer::RenderError;
use crate::render::view::DocumentView;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown template '{0}'")]
pub struct UnknownTemplate(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Classic,
    Creative,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Modern, TemplateId::Classic, TemplateId::Creative];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Creative => "creative",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateId::Modern => "Modern",
            TemplateId::Classic => "Classic",
            TemplateId::Creative => "Creative",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            TemplateId::Modern => include_str!("templates/modern.hbs"),
            TemplateId::Classic => include_str!("templates/classic.hbs"),
            TemplateId::Creative => include_str!("templates/creative.hbs"),
        }
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry in the template picker.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub is_default: bool,
}

pub struct TemplateRegistry {
    hbs: Handlebars<'static>,
    default: TemplateId,
}

impl TemplateRegistry {
    /// Compiles every template. A template that fails to compile is a startup
    /// error, never a render-time surprise.
    pub fn new(default: TemplateId) -> Result<Self, RenderError> {
        let mut hbs = Handlebars::new();
        for id in TemplateId::ALL {
            hbs.register_template_string(id.as_str(), id.source())
                .map_err(|e| RenderError::Compile {
                    template: id,
                    source: Box::new(e),
                })?;
            debug!("Registered template '{}'", id);
        }
        Ok(Self { hbs, default })
    }

    pub fn default_template(&self) -> TemplateId {
        self.default
    }

    /// Resolves a client-supplied identifier. Missing or unknown identifiers
    /// fall back to the default template so a preview is always produced.
    pub fn resolve(&self, identifier: Option<&str>) -> TemplateId {
        match identifier.map(str::trim).filter(|s| !s.is_empty()) {
            None => self.default,
            Some(raw) => raw.parse::<TemplateId>().unwrap_or_else(|e: UnknownTemplate| {
                warn!("{e}; falling back to '{}'", self.default);
                self.default
            }),
        }
    }

    pub fn list(&self) -> Vec<TemplateInfo> {
        TemplateId::ALL
            .into_iter()
            .map(|id| TemplateInfo {
                id,
                name: id.display_name(),
                is_default: id == self.default,
            })
            .collect()
    }

    pub(crate) fn render_view(
        &self,
        template: TemplateId,
        view: &DocumentView<'_>,
    ) -> Result<String, RenderError> {
        self.hbs
            .render(template.as_str(), view)
            .map_err(|e| RenderError::Template {
                template,
                source: Box::new(e),
            })
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_compile() {
        assert!(TemplateRegistry::new(TemplateId::Modern).is_ok());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Classic".parse::<TemplateId>(), Ok(TemplateId::Classic));
        assert_eq!(" creative ".parse::<TemplateId>(), Ok(TemplateId::Creative));
        assert_eq!(
            "brutalist".parse::<TemplateId>(),
            Err(UnknownTemplate("brutalist".to_string()))
        );
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let registry = TemplateRegistry::new(TemplateId::Classic).unwrap();
        assert_eq!(registry.resolve(None), TemplateId::Classic);
        assert_eq!(registry.resolve(Some("")), TemplateId::Classic);
        assert_eq!(registry.resolve(Some("neon")), TemplateId::Classic);
        assert_eq!(registry.resolve(Some("creative")), TemplateId::Creative);
    }

    #[test]
    fn test_list_marks_default() {
        let registry = TemplateRegistry::new(TemplateId::Modern).unwrap();
        let list = registry.list();
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().filter(|t| t.is_default).count(), 1);
        assert_eq!(list[0].id, TemplateId::Modern);
        assert!(list[0].is_default);
    }

    #[test]
    fn test_template_id_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TemplateId::Creative).unwrap(), "\"creative\"");
    }
}
