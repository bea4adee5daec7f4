//! # Sobra Core
//!
//! Business logic of the "Sobra de Doses" leftover-dose patient registration screen.
//!
//! This crate contains the pieces a UI layer drives:
//! - Keystroke masks for CPF, phone and SUS card fields ([`masks`])
//! - The attachment model and capture strategies ([`attachment`])
//! - The group directory loader ([`groups`])
//! - Form state and payload normalisation ([`form`])
//! - The submission orchestrator with busy flag and upload progress ([`submission`])
//! - The screen controller wiring them together ([`LeftOverScreen`])
//!
//! **No transport or UI concerns**: the backend, the capture devices and the
//! presenter are traits implemented elsewhere (`sobra-http`, `sobra-cli`).

pub mod attachment;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod groups;
pub mod masks;
pub mod screen;
pub mod service;
pub mod submission;

pub use attachment::{
    Attachment, AttachmentSlot, AttachmentSlots, CaptureOutcome, CaptureProvider, CaptureSource,
};
pub use config::ClientConfig;
pub use error::{
    CaptureError, ConfigError, RegistrationError, RegistrationResult, ServiceError,
};
pub use form::{FormState, NormalizedPatient, PatientField, PatientRecord};
pub use groups::GroupDirectory;
pub use screen::LeftOverScreen;
pub use service::{CreatePatientRequest, Group, Presenter, ProgressObserver, RegistrationService};
pub use submission::{BusyFlag, SubmissionOrchestrator, UploadProgress};

pub use sobra_types::{GroupId, NonEmptyText};
