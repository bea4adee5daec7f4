//! Capture provider backed by local files.
//!
//! A terminal has no camera or photo library; the "gallery" and the "document
//! picker" both hand back a file given on the command line.

use async_trait::async_trait;
use sobra_core::{CaptureError, CaptureOutcome, CaptureProvider, CaptureSource};
use std::path::{Path, PathBuf};

const PDF_EXTENSION: &str = "pdf";

pub struct FileCaptureProvider {
    path: PathBuf,
}

impl FileCaptureProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_pdf(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
    }

    /// PDFs go through the document picker, everything else through the gallery.
    pub fn preferred_source(&self) -> CaptureSource {
        if self.is_pdf() {
            CaptureSource::Document
        } else {
            CaptureSource::Gallery
        }
    }

    async fn resolve(&self) -> Result<PathBuf, CaptureError> {
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            CaptureError::InvalidResource(format!("{}: {e}", self.path.display()))
        })?;
        if !metadata.is_file() {
            return Err(CaptureError::InvalidResource(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        tokio::fs::canonicalize(&self.path)
            .await
            .map_err(|e| CaptureError::InvalidResource(format!("{}: {e}", self.path.display())))
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[async_trait]
impl CaptureProvider for FileCaptureProvider {
    async fn launch_camera(&self) -> Result<CaptureOutcome, CaptureError> {
        Err(CaptureError::Unavailable(
            "no camera is available in a terminal session".into(),
        ))
    }

    async fn launch_image_library(&self) -> Result<CaptureOutcome, CaptureError> {
        let path = self.resolve().await?;
        Ok(CaptureOutcome::Image {
            uri: file_uri(&path),
        })
    }

    async fn pick_document(&self) -> Result<CaptureOutcome, CaptureError> {
        if !self.is_pdf() {
            return Err(CaptureError::InvalidResource(format!(
                "{} is not a PDF document",
                self.path.display()
            )));
        }
        let path = self.resolve().await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(CaptureOutcome::Document {
            uri: file_uri(&path),
            name,
        })
    }
}
