/// Relational store access layer
///
/// Each collaborator of the mutation pipeline is a trait so the services can
/// be driven by Postgres in production and by in-memory stores in tests.
/// Every single-entity write is atomic; writes that touch a second row
/// (comment counters, reply detachment) run in one transaction.
pub mod block_repo;
pub mod comment_repo;
pub mod notification_repo;
pub mod post_repo;

use crate::error::Result;
use crate::models::{Comment, CommentId, Notification, Post, PostId, UserId};
use async_trait::async_trait;

pub use block_repo::PgBlockRepository;
pub use comment_repo::PgCommentRepository;
pub use notification_repo::PgNotificationRepository;
pub use post_repo::PgPostRepository;

/// Directed block edges, read-only from this service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn block_exists(&self, blocker_id: UserId, blocked_id: UserId) -> Result<bool>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, post_id: PostId) -> Result<Option<Post>>;

    async fn insert(&self, post: &Post) -> Result<Post>;

    /// Write content and media if the stored version still equals
    /// `expected_version`. `None` means the version moved (or the post is gone).
    async fn update(&self, post: &Post, expected_version: i32) -> Result<Option<Post>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, comment_id: CommentId) -> Result<Option<Comment>>;

    /// Insert the comment and bump the post's comment counter. A reply whose
    /// root is no longer live on the same post fails with `NotFound`.
    async fn insert(&self, comment: &Comment) -> Result<Comment>;

    async fn update(&self, comment: &Comment, expected_version: i32)
        -> Result<Option<Comment>>;

    /// Soft-delete a comment and null out `root_id` on its replies in the
    /// same transaction. Returns the number of detached replies, or `None`
    /// when the comment does not exist.
    async fn delete_detaching_replies(&self, comment_id: CommentId) -> Result<Option<u64>>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<Notification>;

    /// Newest first
    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>>;
}
