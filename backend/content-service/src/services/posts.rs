/// Post service - creation, retrieval and owner updates of posts
use super::{ensure_attachments, ensure_not_blank, ensure_owner, MediaOrchestrator};
use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::{CreatePostRequest, Post, PostId, UpdatePostRequest, UserId};
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    media: MediaOrchestrator,
    max_attachments: usize,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        media: MediaOrchestrator,
        max_attachments: usize,
    ) -> Self {
        Self {
            posts,
            media,
            max_attachments,
        }
    }

    /// Create a new post
    pub async fn create_post(&self, owner_id: UserId, request: CreatePostRequest) -> Result<Post> {
        request.validate()?;
        ensure_not_blank(&request.content, "Post")?;
        ensure_attachments(&request.media, self.max_attachments)?;

        let media = self.media.upload(request.media).await?;
        let post = Post::new(owner_id, request.content, media);

        match self.posts.insert(&post).await {
            Ok(created) => {
                tracing::info!(post_id = %created.id, %owner_id, media = created.media.len(), "post created");
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(post_id = %post.id, "post insert failed, discarding uploaded media: {}", err);
                self.media.schedule_discard(post.media);
                Err(err)
            }
        }
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: PostId) -> Result<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    /// Update content and/or replace media of a post. Only the owner may do so.
    ///
    /// New media is uploaded before anything is written; the old media set is
    /// discarded only after the new one is persisted.
    pub async fn update_post(
        &self,
        actor_id: UserId,
        post_id: PostId,
        request: UpdatePostRequest,
    ) -> Result<Post> {
        request.validate()?;
        if request.content.is_none() && request.media.is_none() {
            return Err(AppError::Validation(
                "update must change content or media".to_string(),
            ));
        }
        if let Some(content) = &request.content {
            ensure_not_blank(content, "Post")?;
        }
        if let Some(media) = &request.media {
            ensure_attachments(media, self.max_attachments)?;
        }

        let current = self.get_post(post_id).await?;
        ensure_owner(actor_id, current.owner_id, "post")?;

        let expected_version = request.expected_version.unwrap_or(current.version);
        if expected_version != current.version {
            return Err(AppError::Conflict(format!(
                "Post {} is at version {}, not {}",
                post_id, current.version, expected_version
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

        match self.posts.update(&next, expected_version).await {
            Ok(Some(updated)) => {
                if let Some(stale) = replaced.filter(|refs| !refs.is_empty()) {
                    self.media.schedule_discard(stale);
                }
                tracing::info!(%post_id, version = updated.version, "post updated");
                Ok(updated)
            }
            Ok(None) => {
                self.discard_fresh(&next, replaced.is_some());
                Err(AppError::Conflict(format!(
                    "Post {} was modified concurrently",
                    post_id
                )))
            }
            Err(err) => {
                self.discard_fresh(&next, replaced.is_some());
                Err(err)
            }
        }
    }

    fn discard_fresh(&self, attempted: &Post, uploaded: bool) {
        if uploaded && !attempted.media.is_empty() {
            tracing::warn!(post_id = %attempted.id, "post not written, discarding new media");
            self.media.schedule_discard(attempted.media.clone());
        }
    }
}
