/// Business logic layer for content-service
///
/// - Social graph gate: block-aware permission checks
/// - Media orchestrator: upload/discard of post and comment media
/// - Post and comment services: the content mutation pipeline
/// - Notification dispatcher: persisted + live fan-out of domain events
pub mod comments;
pub mod media;
pub mod notifications;
pub mod posts;
pub mod social_graph;

pub use comments::CommentService;
pub use media::MediaOrchestrator;
pub use notifications::NotificationDispatcher;
pub use posts::PostService;
pub use social_graph::{ensure_owner, SocialGraphGate};

use crate::error::{AppError, Result};
use crate::models::is_blank;
use bytes::Bytes;

pub(crate) fn ensure_not_blank(content: &str, entity: &str) -> Result<()> {
    if is_blank(content) {
        return Err(AppError::Validation(format!(
            "{} content must not be blank",
            entity
        )));
    }
    Ok(())
}

/// Attachment count limit; empty payloads are refused before any upload.
pub(crate) fn ensure_attachments(media: &[Bytes], max_attachments: usize) -> Result<()> {
    if media.len() > max_attachments {
        return Err(AppError::Validation(format!(
            "at most {} media attachments are allowed, got {}",
            max_attachments,
            media.len()
        )));
    }

    if let Some(index) = media.iter().position(|blob| blob.is_empty()) {
        return Err(AppError::Validation(format!(
            "media attachment {} is empty",
            index + 1
        )));
    }

    Ok(())
}
