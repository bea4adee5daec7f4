use sobra_types::{GroupId, TextError};

/// Failure reported by a device capture collaborator (camera, gallery, document picker).
///
/// User cancellation is not an error; it is reported as [`crate::CaptureOutcome::Cancelled`].
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture permission denied: {0}")]
    PermissionDenied(String),
    #[error("capture device unavailable: {0}")]
    Unavailable(String),
    #[error("capture returned an unusable resource: {0}")]
    InvalidResource(String),
}

/// Failure reported by the backend registration collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),
    #[error("failed to read attachment {uri}: {source}")]
    AttachmentRead {
        uri: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid attachment {uri}: {reason}")]
    InvalidAttachment { uri: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
}

/// Errors surfaced by the registration screen controller.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("the group directory has not been loaded")]
    GroupsNotLoaded,
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("backend call failed: {0}")]
    Service(#[from] ServiceError),
}

pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;
