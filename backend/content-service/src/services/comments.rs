/// Comment service - threaded comments with media and notifications
///
/// Creating a comment on someone's post requires that the post owner has not
/// blocked the author. Once the comment is stored, the post owner is notified;
/// notification failures are logged and never fail the comment.
use super::{
    ensure_attachments, ensure_not_blank, ensure_owner, MediaOrchestrator,
    NotificationDispatcher, SocialGraphGate,
};
use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::models::{
    Comment, CommentId, CreateCommentRequest, DomainEvent, PostId, UpdateCommentRequest, UserId,
};
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    gate: SocialGraphGate,
    media: MediaOrchestrator,
    notifications: NotificationDispatcher,
    max_attachments: usize,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        gate: SocialGraphGate,
        media: MediaOrchestrator,
        notifications: NotificationDispatcher,
        max_attachments: usize,
    ) -> Self {
        Self {
            comments,
            posts,
            gate,
            media,
            notifications,
            max_attachments,
        }
    }

    /// Create a comment on a post, optionally threaded under `root_id`.
    pub async fn create_comment(
        &self,
        author_id: UserId,
        post_id: PostId,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        request.validate()?;
        ensure_not_blank(&request.content, "Comment")?;
        ensure_attachments(&request.media, self.max_attachments)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;

        self.gate.ensure_can_act_on(author_id, post.owner_id).await?;

        let mut comment = Comment::new(
            post_id,
            author_id,
            request.content,
            request.root_id,
            Vec::new(),
        );

        if let Some(root_id) = request.root_id {
            let root = self.get_comment(root_id).await?;
            validate_thread_anchor(&root, post_id, Some(comment.id))?;
        }

        comment.media = self.media.upload(request.media).await?;

        let created = match self.comments.insert(&comment).await {
            Ok(created) => created,
            Err(err) => {
                tracing::warn!(comment_id = %comment.id, %post_id, "comment insert failed, discarding uploaded media: {}", err);
                self.media.schedule_discard(comment.media);
                return Err(err);
            }
        };

        tracing::info!(
            comment_id = %created.id,
            %post_id,
            %author_id,
            root_id = ?created.root_id,
            "comment created"
        );

        self.notifications
            .notify(DomainEvent::CommentCreated {
                recipient_id: post.owner_id,
                actor_id: author_id,
                post_id,
                comment_id: created.id,
            })
            .await;

        Ok(created)
    }

    pub async fn get_comment(&self, comment_id: CommentId) -> Result<Comment> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))
    }

    /// Author-only update. `media: Some(..)` replaces the whole media list.
    pub async fn update_comment(
        &self,
        actor_id: UserId,
        comment_id: CommentId,
        request: UpdateCommentRequest,
    ) -> Result<Comment> {
        request.validate()?;
        if request.content.is_none() && request.media.is_none() {
            return Err(AppError::Validation(
                "update must change content or media".to_string(),
            ));
        }
        if let Some(content) = &request.content {
            ensure_not_blank(content, "Comment")?;
        }
        if let Some(media) = &request.media {
            ensure_attachments(media, self.max_attachments)?;
        }

        let current = self.get_comment(comment_id).await?;
        ensure_owner(actor_id, current.author_id, "comment")?;

        let expected_version = request.expected_version.unwrap_or(current.version);
        if expected_version != current.version {
            return Err(AppError::Conflict(format!(
                "Comment {} is at version {}, not {}",
                comment_id, current.version, expected_version
            )));
        }

        let mut next = current.clone();
        if let Some(content) = request.content {
            next.content = content;
        }

        let replaced = match request.media {
            Some(blobs) => {
                next.media = self.media.upload(blobs).await?;
                Some(current.media)
            }
            None => None,
        };

        match self.comments.update(&next, expected_version).await {
            Ok(Some(updated)) => {
                if let Some(stale) = replaced.filter(|refs| !refs.is_empty()) {
                    self.media.schedule_discard(stale);
                }
                tracing::info!(%comment_id, version = updated.version, "comment updated");
                Ok(updated)
            }
            Ok(None) => {
                self.discard_fresh(&next, replaced.is_some());
                Err(AppError::Conflict(format!(
                    "Comment {} was modified concurrently",
                    comment_id
                )))
            }
            Err(err) => {
                self.discard_fresh(&next, replaced.is_some());
                Err(err)
            }
        }
    }

    /// Author-only delete. Replies anchored to the comment become top-level
    /// in the same transaction, so no live comment references a deleted root.
    pub async fn delete_comment(&self, actor_id: UserId, comment_id: CommentId) -> Result<()> {
        let comment = self.get_comment(comment_id).await?;
        ensure_owner(actor_id, comment.author_id, "comment")?;

        let detached = self
            .comments
            .delete_detaching_replies(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;

        if !comment.media.is_empty() {
            self.media.schedule_discard(comment.media);
        }

        tracing::info!(%comment_id, post_id = %comment.post_id, detached, "comment deleted");
        Ok(())
    }

    fn discard_fresh(&self, attempted: &Comment, uploaded: bool) {
        if uploaded && !attempted.media.is_empty() {
            tracing::warn!(comment_id = %attempted.id, "comment not written, discarding new media");
            self.media.schedule_discard(attempted.media.clone());
        }
    }
}

/// A root must belong to the same post and must not be the comment itself.
pub fn validate_thread_anchor(
    root: &Comment,
    post_id: PostId,
    comment_id: Option<CommentId>,
) -> Result<()> {
    if root.post_id != post_id {
        return Err(AppError::Validation(format!(
            "Root comment {} belongs to a different post",
            root.id
        )));
    }

    if comment_id == Some(root.id) {
        return Err(AppError::Validation(
            "A comment cannot be its own root".to_string(),
        ));
    }

    Ok(())
}
