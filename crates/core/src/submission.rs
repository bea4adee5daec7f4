//! Submission orchestrator.
//!
//! Sends one registration to the backend, exposes the busy flag and the upload
//! progress to the UI, and reports the outcome through the presenter.

use crate::attachment::AttachmentSlots;
use crate::constants::{LEFTOVER_CATEGORY_CODE, LEFTOVER_FLAG, SUBMISSION_FAILURE_MESSAGE};
use crate::error::{RegistrationError, RegistrationResult};
use crate::form::NormalizedPatient;
use crate::service::{CreatePatientRequest, Presenter, ProgressObserver, RegistrationService};
use sobra_types::GroupId;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Read-only view of whether a submission is in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

/// Clears the busy flag when dropped, on every exit path.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Upload progress of the current submission, 0 to 100.
#[derive(Debug, Clone, Default)]
pub struct UploadProgress(Arc<AtomicU8>);

impl UploadProgress {
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, percent: u8) {
        self.0.store(percent.min(100), Ordering::Release);
    }
}

/// Stores progress in [`UploadProgress`] and forwards it to an optional UI observer.
struct ProgressRelay {
    progress: UploadProgress,
    forward: Option<Arc<dyn ProgressObserver>>,
}

impl ProgressObserver for ProgressRelay {
    fn on_progress(&self, percent: u8) {
        let percent = percent.min(100);
        self.progress.set(percent);
        if let Some(forward) = &self.forward {
            forward.on_progress(percent);
        }
    }
}

pub struct SubmissionOrchestrator {
    service: Arc<dyn RegistrationService>,
    busy: BusyFlag,
    progress: UploadProgress,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl SubmissionOrchestrator {
    pub fn new(service: Arc<dyn RegistrationService>) -> Self {
        Self {
            service,
            busy: BusyFlag::default(),
            progress: UploadProgress::default(),
            observer: None,
        }
    }

    /// Forwards every progress update to `observer` as well.
    pub fn with_progress_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn busy(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn progress(&self) -> UploadProgress {
        self.progress.clone()
    }

    /// Sends one registration.
    ///
    /// On success the backend message is shown verbatim and the presenter navigates back.
    /// On failure the fixed fallback message is shown and the raw error is reported and
    /// returned. Nothing is retried. A call made while another is in flight fails with
    /// [`RegistrationError::SubmissionInFlight`] without contacting the backend.
    pub async fn submit(
        &self,
        patient: NormalizedPatient,
        attachments: AttachmentSlots,
        group_id: Option<GroupId>,
        presenter: &dyn Presenter,
    ) -> RegistrationResult<String> {
        let Some(_guard) = self.busy.try_acquire() else {
            tracing::warn!("submission ignored: another submission is in flight");
            return Err(RegistrationError::SubmissionInFlight);
        };
        let relay = Arc::new(ProgressRelay {
            progress: self.progress.clone(),
            forward: self.observer.clone(),
        });
        relay.on_progress(0);

        let attachment_count = attachments.len();
        let request = CreatePatientRequest {
            patient,
            category: LEFTOVER_CATEGORY_CODE.to_string(),
            group_id,
            flag: LEFTOVER_FLAG.to_string(),
            extra: None,
            attachments,
        };

        match self.service.create_patient(request, relay).await {
            Ok(message) => {
                tracing::info!(attachments = attachment_count, "registration submitted");
                presenter.alert(&message);
                presenter.navigate_back();
                Ok(message)
            }
            Err(e) => {
                presenter.report_failure(SUBMISSION_FAILURE_MESSAGE, &e);
                Err(RegistrationError::Service(e))
            }
        }
    }
}
