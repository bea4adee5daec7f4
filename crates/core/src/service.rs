//! Collaborator seams of the registration screen.
//!
//! The screen never reaches for ambient state: the backend, the progress
//! observer and the presenter are passed in explicitly.

use crate::attachment::AttachmentSlots;
use crate::error::ServiceError;
use crate::form::NormalizedPatient;
use async_trait::async_trait;
use sobra_types::{GroupId, NonEmptyText};
use std::sync::Arc;

/// A backend-defined group a registration is associated with.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Display name.
    pub group: NonEmptyText,
}

/// Everything sent to the backend when creating a patient.
#[derive(Debug, Clone)]
pub struct CreatePatientRequest {
    pub patient: NormalizedPatient,
    pub category: String,
    /// `None` when no group could be selected; sent as an empty value.
    pub group_id: Option<GroupId>,
    pub flag: String,
    /// Optional extra field accepted by the backend; the leftover-dose screen never fills it.
    pub extra: Option<String>,
    pub attachments: AttachmentSlots,
}

/// Receives upload progress as a percentage in `0..=100`.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl<F> ProgressObserver for F
where
    F: Fn(u8) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        self(percent)
    }
}

/// Backend patient-registration collaborator.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Fetches the groups of a category, in backend order.
    async fn fetch_groups(&self, category: &str) -> Result<Vec<Group>, ServiceError>;

    /// Creates a patient in one request and returns the backend confirmation message.
    ///
    /// Progress is reported through `progress` while the request is being uploaded.
    async fn create_patient(
        &self,
        request: CreatePatientRequest,
        progress: Arc<dyn ProgressObserver>,
    ) -> Result<String, ServiceError>;
}

/// User-facing side effects of the screen: alerts, navigation and error reporting.
pub trait Presenter: Send + Sync {
    /// Shows a message to the user.
    fn alert(&self, message: &str);

    /// Leaves the registration screen.
    fn navigate_back(&self);

    /// Reports a failure: logs the raw error and shows the fixed user-facing message.
    fn report_failure(&self, user_message: &str, error: &(dyn std::error::Error + 'static)) {
        tracing::error!(error = %error, "{}", user_message);
        self.alert(user_message);
    }
}
