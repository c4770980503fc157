//! Wizard state machine.
//!
//! States are named, never numbered: `Personal → Education → Experience →
//! Skills → Preview`. Forward moves between sections pass through the
//! section validator; `Preview` is reached only by generating and left only by
//! editing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::fields::{RawForm, Section};
use crate::form::validation::{validate_section, SectionValidation};
use crate::render::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Education,
    Experience,
    Skills,
    Preview,
}

/// Form sections in the order the wizard walks them.
const SECTION_STEPS: [WizardStep; 4] = [
    WizardStep::Personal,
    WizardStep::Education,
    WizardStep::Experience,
    WizardStep::Skills,
];

impl WizardStep {
    pub fn first() -> Self {
        SECTION_STEPS[0]
    }

    pub fn last_section() -> Self {
        SECTION_STEPS[SECTION_STEPS.len() - 1]
    }

    pub fn section(&self) -> Option<Section> {
        match self {
            WizardStep::Personal => Some(Section::Personal),
            WizardStep::Education => Some(Section::Education),
            WizardStep::Experience => Some(Section::Experience),
            WizardStep::Skills => Some(Section::Skills),
            WizardStep::Preview => None,
        }
    }

    fn index(&self) -> Option<usize> {
        SECTION_STEPS.iter().position(|s| s == self)
    }

    /// The section after this one, if any.
    pub fn following(&self) -> Option<WizardStep> {
        self.index().and_then(|i| SECTION_STEPS.get(i + 1)).copied()
    }

    /// The section before this one, if any.
    pub fn preceding(&self) -> Option<WizardStep> {
        self.index()
            .and_then(|i| i.checked_sub(1))
            .map(|i| SECTION_STEPS[i])
    }

    /// Completion percentage for the progress bar: 0 on the first section,
    /// 100 on the last section and in preview.
    pub fn progress(&self) -> u8 {
        let last = SECTION_STEPS.len() - 1;
        match self.index() {
            Some(i) => ((i * 100) / last) as u8,
            None => 100,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.section().is_some()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.section() {
            Some(section) => write!(f, "{}", section),
            None => f.write_str("Preview"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    Next,
    Previous,
    SkipExperience,
    Generate,
    Edit,
    Modify,
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardAction::Next => "go to the next section",
            WizardAction::Previous => "go back",
            WizardAction::SkipExperience => "skip work experience",
            WizardAction::Generate => "generate the CV",
            WizardAction::Edit => "return to editing",
            WizardAction::Modify => "change form data",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Cannot {action} from the {from} step")]
    NotAllowed {
        from: WizardStep,
        action: WizardAction,
    },

    #[error("{} section is incomplete: {}", .0.section, .0.errors.join("; "))]
    SectionIncomplete(SectionValidation),

    #[error("Please correct the following errors: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Render(#[from] RenderError),
}

fn not_allowed(from: WizardStep, action: WizardAction) -> TransitionError {
    TransitionError::NotAllowed { from, action }
}

/// Validates the current section and moves to the one after it.
pub fn next(from: WizardStep, form: &RawForm) -> Result<WizardStep, TransitionError> {
    let (section, to) = match (from.section(), from.following()) {
        (Some(section), Some(to)) => (section, to),
        _ => return Err(not_allowed(from, WizardAction::Next)),
    };
    ensure_section(section, form)?;
    Ok(to)
}

/// Moves back one section. Going back never validates.
pub fn previous(from: WizardStep) -> Result<WizardStep, TransitionError> {
    from.preceding()
        .ok_or_else(|| not_allowed(from, WizardAction::Previous))
}

/// Clears every experience entry and lands on the section after experience.
pub fn skip_experience(from: WizardStep, form: &mut RawForm) -> Result<WizardStep, TransitionError> {
    if from != WizardStep::Experience {
        return Err(not_allowed(from, WizardAction::SkipExperience));
    }
    let to = WizardStep::Experience
        .following()
        .ok_or_else(|| not_allowed(from, WizardAction::SkipExperience))?;
    form.clear_section(Section::Experience);
    Ok(to)
}

/// Gate for leaving the last section towards the preview.
///
/// Earlier sections stay editable after their own gate passed, so every
/// section is checked again here, the current one first.
pub fn check_generate(from: WizardStep, form: &RawForm) -> Result<(), TransitionError> {
    if from != WizardStep::last_section() {
        return Err(not_allowed(from, WizardAction::Generate));
    }
    let current = from.section();
    if let Some(section) = current {
        ensure_section(section, form)?;
    }
    for section in Section::ALL.into_iter().filter(|s| Some(*s) != current) {
        ensure_section(section, form)?;
    }
    Ok(())
}

pub fn edit(from: WizardStep) -> Result<WizardStep, TransitionError> {
    match from {
        WizardStep::Preview => Ok(WizardStep::last_section()),
        _ => Err(not_allowed(from, WizardAction::Edit)),
    }
}

fn ensure_section(section: Section, form: &RawForm) -> Result<(), TransitionError> {
    let result = validate_section(section, form);
    if result.passed {
        Ok(())
    } else {
        Err(TransitionError::SectionIncomplete(result))
    }
}
