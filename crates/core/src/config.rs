//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! backend collaborator. Services never read environment variables while a
//! request is being handled.

use crate::constants::{
    API_TOKEN_ENV, API_URL_ENV, DEFAULT_REQUEST_TIMEOUT_SECS, REQUEST_TIMEOUT_ENV,
};
use crate::error::ConfigError;
use sobra_types::NonEmptyText;
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_base_url: NonEmptyText,
    request_timeout: Duration,
    api_token: Option<String>,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL must be an `http://` or `https://` URL; a trailing slash is dropped.
    pub fn new(
        api_base_url: &str,
        request_timeout: Duration,
        api_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let trimmed = api_base_url.trim().trim_end_matches('/');
        let api_base_url = NonEmptyText::new(trimmed)?;

        if !(api_base_url.as_str().starts_with("http://")
            || api_base_url.as_str().starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                name: API_URL_ENV,
                reason: "must start with http:// or https://".into(),
            });
        }

        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: REQUEST_TIMEOUT_ENV,
                reason: "timeout must be greater than zero".into(),
            });
        }

        let api_token = api_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            api_base_url,
            request_timeout,
            api_token,
        })
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `SOBRA_API_URL` (required), `SOBRA_REQUEST_TIMEOUT_SECS` and `SOBRA_API_TOKEN`.
    /// A `.env` file in the working directory is honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_values(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(REQUEST_TIMEOUT_ENV).ok(),
            std::env::var(API_TOKEN_ENV).ok(),
        )
    }

    /// Build configuration from already-read raw values.
    pub fn from_values(
        api_url: Option<String>,
        timeout_secs: Option<String>,
        api_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(API_URL_ENV))?;

        let timeout_secs = match timeout_secs
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: REQUEST_TIMEOUT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self::new(&api_url, Duration::from_secs(timeout_secs), api_token)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_str()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Join a path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
