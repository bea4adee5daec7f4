//! Sobra HTTP
//!
//! Backend collaborator of the registration screen over HTTP.
//!
//! ## Endpoints
//!
//! ```text
//! GET  {base}/groups?category=2   -> [{"id": 1, "group": "Nome"}]
//! POST {base}/patients            multipart/form-data -> {"message": "..."}
//! ```
//!
//! The patient form carries the normalized text fields, `category`, `groupId`,
//! `flag`, the optional `extra` field and one file part per filled attachment
//! slot. Attachment files are read from their local URI and streamed in chunks so
//! upload progress can be reported while the request body is written.
//!
//! ## Example Usage
//!
//! ```no_run
//! use sobra_core::{ClientConfig, LeftOverScreen, Presenter};
//! use sobra_http::HttpRegistrationService;
//! use std::sync::Arc;
//!
//! struct Stdout;
//! impl Presenter for Stdout {
//!     fn alert(&self, message: &str) { println!("{message}"); }
//!     fn navigate_back(&self) {}
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let service = Arc::new(HttpRegistrationService::new(config)?);
//! let mut screen = LeftOverScreen::new(service, Arc::new(Stdout));
//! screen.activate().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod upload;

pub use client::HttpRegistrationService;

/// Multipart chunk size used when streaming attachment files.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
