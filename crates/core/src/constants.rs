//! Constants used throughout the registration core.
//!
//! Fixed wire values and user-facing messages live here so the screen, the
//! orchestrator and the HTTP collaborator agree on them.

/// Category code of the leftover-dose registration ("Sobra de Doses").
pub const LEFTOVER_CATEGORY_CODE: &str = "2";

/// Flag sent with every leftover-dose registration.
pub const LEFTOVER_FLAG: &str = "false";

/// Title of the registration screen.
pub const SCREEN_TITLE: &str = "Sobra de Doses";

/// Shown when the group directory cannot be fetched.
pub const GROUPS_FAILURE_MESSAGE: &str =
    "Não foi possível listar os grupos. Tente novamente ou contate o suporte.";

/// Shown when a registration submission fails.
pub const SUBMISSION_FAILURE_MESSAGE: &str =
    "Não foi possível efetuar o cadastro. Tente novamente ou contate o suporte.";

/// MIME type assigned to every document picked through the file picker.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// MIME type used when no usable type can be derived for an attachment.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Prefix of MIME types derived from captured image extensions.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "SOBRA_API_URL";

/// Environment variable holding the request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "SOBRA_REQUEST_TIMEOUT_SECS";

/// Environment variable holding the optional bearer token.
pub const API_TOKEN_ENV: &str = "SOBRA_API_TOKEN";

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
