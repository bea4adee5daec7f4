//! Attachment loading and progress-reporting multipart parts.

use crate::UPLOAD_CHUNK_SIZE;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::Part;
use reqwest::Body;
use sobra_core::constants::UNKNOWN_MIME_TYPE;
use sobra_core::{Attachment, AttachmentSlot, AttachmentSlots, ProgressObserver, ServiceError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const FILE_SCHEME: &str = "file://";

/// An attachment whose bytes have been read into memory.
#[derive(Debug)]
pub(crate) struct LoadedAttachment {
    pub slot: AttachmentSlot,
    pub attachment: Attachment,
    pub bytes: Bytes,
}

/// Resolves an attachment URI to a local path.
///
/// Accepts `file://` URIs and plain paths. Other schemes cannot be read by this client.
pub(crate) fn local_path(uri: &str) -> Result<PathBuf, ServiceError> {
    if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
        return Ok(PathBuf::from(path));
    }
    if uri.contains("://") {
        return Err(ServiceError::InvalidAttachment {
            uri: uri.to_string(),
            reason: "only file:// URIs and local paths can be uploaded".into(),
        });
    }
    if uri.trim().is_empty() {
        return Err(ServiceError::InvalidAttachment {
            uri: uri.to_string(),
            reason: "empty uri".into(),
        });
    }
    Ok(PathBuf::from(uri))
}

/// Reads every filled slot, in screen order. Fails on the first unreadable file.
pub(crate) async fn load_attachments(
    slots: &AttachmentSlots,
) -> Result<Vec<LoadedAttachment>, ServiceError> {
    let mut loaded = Vec::with_capacity(slots.len());
    for (slot, attachment) in slots.iter() {
        let path = local_path(&attachment.uri)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ServiceError::AttachmentRead {
                uri: attachment.uri.clone(),
                source,
            })?;
        tracing::debug!(?slot, size = bytes.len(), "attachment loaded");
        loaded.push(LoadedAttachment {
            slot,
            attachment: attachment.clone(),
            bytes: Bytes::from(bytes),
        });
    }
    Ok(loaded)
}

/// Counts bytes handed to the transport and converts them to a percentage.
pub(crate) struct UploadCounter {
    sent: AtomicU64,
    total: u64,
    observer: Arc<dyn ProgressObserver>,
}

impl UploadCounter {
    pub fn new(total: u64, observer: Arc<dyn ProgressObserver>) -> Self {
        Self {
            sent: AtomicU64::new(0),
            total,
            observer,
        }
    }

    pub fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::AcqRel) + bytes;
        self.observer.on_progress(percent(sent, self.total));
    }

    /// Reports completion once the backend has answered.
    pub fn finish(&self) {
        self.observer.on_progress(100);
    }
}

fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (sent.min(total) * 100 / total) as u8
}

/// Content type sent for `attachment`.
///
/// The type is guessed from the file extension; a guess `reqwest` cannot parse
/// is sent as `application/octet-stream` rather than failing the submission.
pub(crate) fn part_mime_type(attachment: &Attachment) -> &str {
    if Part::bytes(Vec::new()).mime_str(&attachment.mime_type).is_ok() {
        &attachment.mime_type
    } else {
        tracing::warn!(
            uri = %attachment.uri,
            mime_type = %attachment.mime_type,
            "unparseable MIME type, sending as {UNKNOWN_MIME_TYPE}"
        );
        UNKNOWN_MIME_TYPE
    }
}

/// Builds a file part whose body reports progress as it is consumed.
pub(crate) fn progress_part(
    loaded: LoadedAttachment,
    counter: Arc<UploadCounter>,
) -> Result<Part, ServiceError> {
    let length = loaded.bytes.len() as u64;
    let chunks: Vec<Result<Bytes, std::io::Error>> = loaded
        .bytes
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(|chunk| Ok(loaded.bytes.slice_ref(chunk)))
        .collect();

    let stream = futures_util::stream::iter(chunks).inspect(move |chunk| {
        if let Ok(chunk) = chunk {
            counter.advance(chunk.len() as u64);
        }
    });

    Part::stream_with_length(Body::wrap_stream(stream), length)
        .file_name(loaded.attachment.name.clone())
        .mime_str(part_mime_type(&loaded.attachment))
        .map_err(|e| ServiceError::InvalidAttachment {
            uri: loaded.attachment.uri.clone(),
            reason: format!("invalid MIME type: {e}"),
        })
}
