//! Attachment model and capture strategies.
//!
//! A registration carries up to five attachments, one per [`AttachmentSlot`].
//! Each attachment is produced by one of three capture strategies (camera,
//! photo library, PDF document picker) through an injected [`CaptureProvider`].
//!
//! The MIME type of a captured image is derived from the file extension of its
//! URI (`photo.png` becomes `image/png`). This is a best-effort guess and is not
//! verified against the file content.

use crate::constants::{IMAGE_MIME_PREFIX, PDF_MIME_TYPE, UNKNOWN_MIME_TYPE};
use crate::error::CaptureError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// The five fixed attachment roles, in screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttachmentSlot {
    IdentityFront,
    IdentityBack,
    CpfOrSusProof,
    AddressProof,
    WorkContract,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 5] = [
        AttachmentSlot::IdentityFront,
        AttachmentSlot::IdentityBack,
        AttachmentSlot::CpfOrSusProof,
        AttachmentSlot::AddressProof,
        AttachmentSlot::WorkContract,
    ];

    /// Title shown above the slot on the registration screen.
    pub fn label(self) -> &'static str {
        match self {
            AttachmentSlot::IdentityFront => "Documento de Identidade - Frente",
            AttachmentSlot::IdentityBack => "Documento de Identidade - Verso",
            AttachmentSlot::CpfOrSusProof => "CPF ou Cartão SUS",
            AttachmentSlot::AddressProof => "Comprovante de Endereço",
            AttachmentSlot::WorkContract => "Contracheque ou Contrato de Trabalho",
        }
    }

    /// Name of the multipart part carrying this slot's file.
    pub fn form_field(self) -> &'static str {
        match self {
            AttachmentSlot::IdentityFront => "idDocFront",
            AttachmentSlot::IdentityBack => "idDocVerse",
            AttachmentSlot::CpfOrSusProof => "cpf",
            AttachmentSlot::AddressProof => "addressProof",
            AttachmentSlot::WorkContract => "workContract",
        }
    }

    /// Whether the screen marks the slot with an asterisk.
    ///
    /// Display only: a missing attachment is left for the backend to reject.
    pub fn is_marked_mandatory(self) -> bool {
        true
    }
}

/// A single captured file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attachment {
    /// Local resource locator (`file://...` or a plain path).
    pub uri: String,
    /// Display name of the file.
    pub name: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Attachment {
    /// Builds an attachment from a captured image URI.
    ///
    /// The name is the last path segment of the URI and the MIME type is `image/<extension>`.
    pub fn from_image_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let name = file_name_of(&uri).to_string();
        let mime_type = match extension_of(&name) {
            Some(ext) => format!("{IMAGE_MIME_PREFIX}{ext}"),
            None => UNKNOWN_MIME_TYPE.to_string(),
        };
        Self {
            uri,
            name,
            mime_type,
        }
    }

    /// Builds an attachment from a picked PDF document.
    pub fn from_document(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            mime_type: PDF_MIME_TYPE.to_string(),
        }
    }
}

fn file_name_of(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

fn extension_of(file_name: &str) -> Option<&str> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// How an attachment is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Camera,
    Gallery,
    Document,
}

/// Result of a device capture call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The user dismissed the camera, gallery or picker.
    Cancelled,
    /// An image taken with the camera or chosen from the photo library.
    Image { uri: String },
    /// A document chosen with the file picker, with the display name it reported.
    Document { uri: String, name: String },
}

/// Device integration producing captures: camera, photo library and PDF picker.
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    async fn launch_camera(&self) -> Result<CaptureOutcome, CaptureError>;
    async fn launch_image_library(&self) -> Result<CaptureOutcome, CaptureError>;
    /// Opens a file picker restricted to PDF documents.
    async fn pick_document(&self) -> Result<CaptureOutcome, CaptureError>;
}

/// Runs one capture and turns the outcome into an attachment.
///
/// Returns `Ok(None)` when the user cancelled.
pub async fn capture(
    provider: &dyn CaptureProvider,
    source: CaptureSource,
) -> Result<Option<Attachment>, CaptureError> {
    let outcome = match source {
        CaptureSource::Camera => provider.launch_camera().await?,
        CaptureSource::Gallery => provider.launch_image_library().await?,
        CaptureSource::Document => provider.pick_document().await?,
    };

    let attachment = match outcome {
        CaptureOutcome::Cancelled => return Ok(None),
        CaptureOutcome::Image { uri } => Attachment::from_image_uri(uri),
        CaptureOutcome::Document { uri, name } => Attachment::from_document(uri, name),
    };

    if attachment.uri.trim().is_empty() {
        return Err(CaptureError::InvalidResource(
            "capture returned an empty uri".into(),
        ));
    }

    Ok(Some(attachment))
}

/// The attachment slots of one registration; each slot holds at most one attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSlots {
    slots: BTreeMap<AttachmentSlot, Attachment>,
}

impl AttachmentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an attachment, returning the one it replaced.
    pub fn set(&mut self, slot: AttachmentSlot, attachment: Attachment) -> Option<Attachment> {
        self.slots.insert(slot, attachment)
    }

    pub fn get(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        self.slots.get(&slot)
    }

    pub fn clear(&mut self, slot: AttachmentSlot) -> Option<Attachment> {
        self.slots.remove(&slot)
    }

    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    /// Filled slots in screen order.
    pub fn iter(&self) -> impl Iterator<Item = (AttachmentSlot, &Attachment)> {
        self.slots.iter().map(|(slot, a)| (*slot, a))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
