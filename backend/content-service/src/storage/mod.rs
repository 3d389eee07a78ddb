/// Object storage capability used by the media orchestrator
///
/// The storage adapter, not the client, decides the media kind: payloads are
/// sniffed on the server and anything that is neither image nor video is
/// refused.
pub mod s3;

use crate::models::{MediaKind, MediaRef};
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use s3::S3ObjectStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported media payload: {0}")]
    UnsupportedMedia(String),

    #[error("object storage request failed: {0}")]
    Request(String),
}

/// What the storage backend reports for a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    pub kind: MediaKind,
}

impl From<StoredObject> for MediaRef {
    fn from(object: StoredObject) -> Self {
        MediaRef::new(object.url, object.kind)
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, blob: Bytes) -> Result<StoredObject, StorageError>;

    /// `Ok(false)` when the backend did not confirm the deletion.
    async fn delete(&self, url: &str, kind: MediaKind) -> Result<bool, StorageError>;
}

/// Sniff a payload's MIME type and media kind from its leading bytes.
pub fn sniff_media(blob: &[u8]) -> Result<(&'static str, MediaKind), StorageError> {
    let detected = infer::get(blob)
        .ok_or_else(|| StorageError::UnsupportedMedia("unrecognized content".to_string()))?;

    let kind = MediaKind::from_mime(detected.mime_type())
        .ok_or_else(|| StorageError::UnsupportedMedia(detected.mime_type().to_string()))?;

    Ok((detected.mime_type(), kind))
}
