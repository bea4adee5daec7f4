//! The "Sobra de Doses" registration screen controller.
//!
//! Wires the form state, the group directory and the submission orchestrator to
//! the injected collaborators. A UI layer forwards its events here and renders
//! from the accessors.

use crate::attachment::{self, Attachment, AttachmentSlot, CaptureProvider, CaptureSource};
use crate::constants::LEFTOVER_CATEGORY_CODE;
use crate::error::RegistrationResult;
use crate::form::{FormState, PatientField};
use crate::groups::GroupDirectory;
use crate::service::{Presenter, ProgressObserver, RegistrationService};
use crate::submission::{BusyFlag, SubmissionOrchestrator, UploadProgress};
use sobra_types::GroupId;
use std::sync::Arc;

pub struct LeftOverScreen {
    service: Arc<dyn RegistrationService>,
    presenter: Arc<dyn Presenter>,
    form: FormState,
    groups: GroupDirectory,
    orchestrator: SubmissionOrchestrator,
}

impl LeftOverScreen {
    pub fn new(service: Arc<dyn RegistrationService>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            orchestrator: SubmissionOrchestrator::new(service.clone()),
            service,
            presenter,
            form: FormState::new(),
            groups: GroupDirectory::new(),
        }
    }

    pub fn with_progress_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.orchestrator = self.orchestrator.with_progress_observer(observer);
        self
    }

    /// Called when the screen becomes active: loads the group directory if needed.
    ///
    /// A failure has already been shown to the user when this returns; the screen stays usable.
    pub async fn activate(&mut self) -> RegistrationResult<()> {
        self.groups
            .load(
                LEFTOVER_CATEGORY_CODE,
                self.service.as_ref(),
                self.presenter.as_ref(),
            )
            .await
    }

    /// Applies one keystroke change. Returns the masked value now shown in the field.
    pub fn set_field(&mut self, field: PatientField, raw: &str) -> &str {
        self.form.set_field(field, raw)
    }

    pub fn field(&self, field: PatientField) -> &str {
        self.form.field(field)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Captures an attachment into `slot`.
    ///
    /// Returns `Ok(false)` when the user cancelled; the slot keeps its previous attachment.
    pub async fn capture(
        &mut self,
        slot: AttachmentSlot,
        source: CaptureSource,
        provider: &dyn CaptureProvider,
    ) -> RegistrationResult<bool> {
        match attachment::capture(provider, source).await {
            Ok(Some(captured)) => {
                self.form.set_attachment(slot, captured);
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!(?slot, ?source, "capture cancelled");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(?slot, ?source, error = %e, "capture failed");
                Err(e.into())
            }
        }
    }

    pub async fn capture_from_camera(
        &mut self,
        slot: AttachmentSlot,
        provider: &dyn CaptureProvider,
    ) -> RegistrationResult<bool> {
        self.capture(slot, CaptureSource::Camera, provider).await
    }

    pub async fn capture_from_gallery(
        &mut self,
        slot: AttachmentSlot,
        provider: &dyn CaptureProvider,
    ) -> RegistrationResult<bool> {
        self.capture(slot, CaptureSource::Gallery, provider).await
    }

    pub async fn capture_from_document(
        &mut self,
        slot: AttachmentSlot,
        provider: &dyn CaptureProvider,
    ) -> RegistrationResult<bool> {
        self.capture(slot, CaptureSource::Document, provider).await
    }

    pub fn clear_attachment(&mut self, slot: AttachmentSlot) -> Option<Attachment> {
        self.form.clear_attachment(slot)
    }

    pub fn attachment(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        self.form.attachment(slot)
    }

    pub fn groups(&self) -> &GroupDirectory {
        &self.groups
    }

    pub fn select_group(&mut self, id: GroupId) -> RegistrationResult<()> {
        self.groups.select(id)
    }

    /// Clears the group selection; the next [`LeftOverScreen::activate`] refetches.
    pub fn clear_group_selection(&mut self) {
        self.groups.clear_selection();
    }

    pub fn busy(&self) -> BusyFlag {
        self.orchestrator.busy()
    }

    pub fn upload_progress(&self) -> UploadProgress {
        self.orchestrator.progress()
    }

    /// Submits the normalized record with every filled attachment.
    ///
    /// The form is cleared after a success and left untouched after a failure.
    pub async fn submit(&mut self) -> RegistrationResult<String> {
        let message = self
            .orchestrator
            .submit(
                self.form.normalized(),
                self.form.attachments().clone(),
                self.groups.selected(),
                self.presenter.as_ref(),
            )
            .await?;
        self.form.reset();
        Ok(message)
    }
}
