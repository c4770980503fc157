use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::form::collector::collect;
use crate::form::fields::RawForm;
use crate::form::validation::validate_submission;
use crate::models::image::ProfileImage;
use crate::render::{render, Fragment, TemplateId, TemplateRegistry};
use crate::wizard::machine::{self, TransitionError, WizardAction, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Image upload was superseded by a newer selection")]
pub struct Superseded;

/// Identifies one image selection. Only the most recent ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Holds the profile image with supersede-on-reselect semantics.
///
/// Every new selection (or removal) bumps the generation, so an upload that
/// finishes after a newer one started is discarded instead of overwriting it.
#[derive(Debug, Default)]
pub struct ImageSlot {
    current: Option<ProfileImage>,
    generation: u64,
}

impl ImageSlot {
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.generation += 1;
        UploadTicket(self.generation)
    }

    pub fn complete(&mut self, ticket: UploadTicket, image: ProfileImage) -> Result<(), Superseded> {
        if ticket.0 != self.generation {
            debug!(
                "Discarding stale image upload (ticket {}, current {})",
                ticket.0, self.generation
            );
            return Err(Superseded);
        }
        self.current = Some(image);
        Ok(())
    }

    /// Invalidates every outstanding ticket without touching the stored image.
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.cancel_pending();
    }

    pub fn current(&self) -> Option<&ProfileImage> {
        self.current.as_ref()
    }
}

/// One user's pass through the wizard.
#[derive(Debug)]
pub struct WizardSession {
    id: Uuid,
    step: WizardStep,
    form: RawForm,
    template: TemplateId,
    image: ImageSlot,
    preview: Option<Fragment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: WizardStep,
    pub progress: u8,
    pub template: TemplateId,
    pub form: RawForm,
    pub has_profile_image: bool,
    pub preview: Option<Fragment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    pub fn new(template: TemplateId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: WizardStep::first(),
            form: RawForm::new(),
            template,
            image: ImageSlot::default(),
            preview: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            step: self.step,
            progress: self.step.progress(),
            template: self.template,
            form: self.form.clone(),
            has_profile_image: self.image.current().is_some(),
            preview: self.preview.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn ensure_editable(&self) -> Result<(), TransitionError> {
        if self.step.is_editable() {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                from: self.step,
                action: WizardAction::Modify,
            })
        }
    }

    fn move_to(&mut self, to: WizardStep) -> WizardStep {
        debug!("Session {}: {} -> {}", self.id, self.step, to);
        self.step = to;
        self.touch();
        to
    }

    /// Replaces the submitted field groups; other groups keep their values.
    pub fn update_fields(&mut self, fields: RawForm) -> Result<(), TransitionError> {
        self.ensure_editable()?;
        self.form.merge(fields);
        self.touch();
        Ok(())
    }

    pub fn select_template(&mut self, template: TemplateId) -> Result<(), TransitionError> {
        self.ensure_editable()?;
        self.template = template;
        self.touch();
        Ok(())
    }

    pub fn begin_image_upload(&mut self) -> Result<UploadTicket, TransitionError> {
        self.ensure_editable()?;
        Ok(self.image.begin_upload())
    }

    pub fn complete_image_upload(
        &mut self,
        ticket: UploadTicket,
        image: ProfileImage,
    ) -> Result<(), Superseded> {
        self.image.complete(ticket, image)?;
        self.touch();
        Ok(())
    }

    pub fn remove_image(&mut self) -> Result<(), TransitionError> {
        self.ensure_editable()?;
        self.image.clear();
        self.touch();
        Ok(())
    }

    pub fn next(&mut self) -> Result<WizardStep, TransitionError> {
        let to = machine::next(self.step, &self.form)?;
        Ok(self.move_to(to))
    }

    pub fn previous(&mut self) -> Result<WizardStep, TransitionError> {
        let to = machine::previous(self.step)?;
        Ok(self.move_to(to))
    }

    pub fn skip_experience(&mut self) -> Result<WizardStep, TransitionError> {
        let to = machine::skip_experience(self.step, &mut self.form)?;
        Ok(self.move_to(to))
    }

    /// Validates, builds the document and renders it, then enters preview.
    /// On any failure the session stays on the last section.
    pub fn generate(&mut self, registry: &TemplateRegistry) -> Result<&Fragment, TransitionError> {
        machine::check_generate(self.step, &self.form)?;

        let errors = validate_submission(&self.form);
        if !errors.is_empty() {
            return Err(TransitionError::Invalid(errors));
        }

        let document = collect(&self.form, self.image.current().cloned());
        let fragment = render(registry, Some(self.template.as_str()), &document)?;

        info!("Session {} generated a '{}' preview", self.id, fragment.template);
        // Uploads still in flight must not land in the preview.
        self.image.cancel_pending();
        self.move_to(WizardStep::Preview);
        Ok(self.preview.insert(fragment))
    }

    pub fn edit(&mut self) -> Result<WizardStep, TransitionError> {
        let to = machine::edit(self.step)?;
        self.preview = None;
        Ok(self.move_to(to))
    }
}
