use super::media::{classify, ClassifiedMedia, MediaRef};
use super::{CommentId, PostId, UserId};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const MAX_POST_CONTENT_CHARS: u64 = 10_000;
pub const MAX_COMMENT_CONTENT_CHARS: u64 = 2_000;

/// A post owned by a single user.
///
/// Only the owner's id is carried, never a user object, so the serialized
/// shape stays the same for every entity type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    #[sqlx(rename = "user_id")]
    pub owner_id: UserId,
    pub content: String,
    #[sqlx(json)]
    pub media: Vec<MediaRef>,
    pub view_count: i64,
    pub reaction_count: i64,
    pub comment_count: i64,
    /// Optimistic concurrency token, bumped on every successful update
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(owner_id: UserId, content: String, media: Vec<MediaRef>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            content,
            media,
            view_count: 0,
            reaction_count: 0,
            comment_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn classified_media(&self) -> ClassifiedMedia {
        classify(&self.media)
    }
}

/// A comment on a post, optionally threaded under a root comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    #[sqlx(rename = "user_id")]
    pub author_id: UserId,
    pub content: String,
    pub root_id: Option<CommentId>,
    #[sqlx(json)]
    pub media: Vec<MediaRef>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        post_id: PostId,
        author_id: UserId,
        content: String,
        root_id: Option<CommentId>,
        media: Vec<MediaRef>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content,
            root_id,
            media,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.root_id.is_none()
    }

    pub fn classified_media(&self) -> ClassifiedMedia {
        classify(&self.media)
    }
}

/// Length limits are enforced by `Validate`; whitespace-only text is not.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = MAX_POST_CONTENT_CHARS))]
    pub content: String,
    /// Raw uploaded payloads, in client order
    pub media: Vec<Bytes>,
}

/// Partial post update. `media: Some(..)` replaces the whole media list.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = MAX_POST_CONTENT_CHARS))]
    pub content: Option<String>,
    pub media: Option<Vec<Bytes>>,
    pub expected_version: Option<i32>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = MAX_COMMENT_CONTENT_CHARS))]
    pub content: String,
    pub root_id: Option<CommentId>,
    pub media: Vec<Bytes>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = MAX_COMMENT_CONTENT_CHARS))]
    pub content: Option<String>,
    pub media: Option<Vec<Bytes>>,
    pub expected_version: Option<i32>,
}
