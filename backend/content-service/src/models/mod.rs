/// Data models for content-service
///
/// - Post / Comment: content entities, identity references only
/// - MediaRef: stored media objects attached to content
/// - Notification / DomainEvent: fan-out records and the events that produce them
mod content;
mod media;
mod notification;

use uuid::Uuid;

pub type UserId = Uuid;
pub type PostId = Uuid;
pub type CommentId = Uuid;
pub type NotificationId = Uuid;

pub use content::{
    is_blank, Comment, CreateCommentRequest, CreatePostRequest, Post, UpdateCommentRequest,
    UpdatePostRequest, MAX_COMMENT_CONTENT_CHARS, MAX_POST_CONTENT_CHARS,
};
pub use media::{classify, ClassifiedMedia, MediaKind, MediaRef};
pub use notification::{DomainEvent, Notification, NotificationPayload};
