use super::CommentRepository;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentId};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    /// Get a single comment by ID (excluding soft-deleted)
    async fn find_by_id(&self, comment_id: CommentId) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, content, root_id, media, version, created_at, updated_at
            FROM comments
            WHERE id = $1 AND soft_delete IS NULL
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn insert(&self, comment: &Comment) -> Result<Comment> {
        let mut tx = self.pool.begin().await?;

        // The root is locked until commit so a concurrent delete cannot
        // detach replies before this one is visible.
        if let Some(root_id) = comment.root_id {
            let root_alive = sqlx::query_scalar::<_, i32>(
                r#"
                SELECT 1 FROM comments
                WHERE id = $1 AND post_id = $2 AND soft_delete IS NULL
                FOR SHARE
                "#,
            )
            .bind(root_id)
            .bind(comment.post_id)
            .fetch_optional(&mut *tx)
            .await?;

            if root_alive.is_none() {
                tx.rollback().await?;
                return Err(AppError::NotFound(format!(
                    "Root comment {} not found",
                    root_id
                )));
            }
        }

        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, root_id, media, version,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, post_id, user_id, content, root_id, media, version, created_at, updated_at
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.root_id)
        .bind(Json(&comment.media))
        .bind(comment.version)
        .bind(comment.created_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(comment.post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update(
        &self,
        comment: &Comment,
        expected_version: i32,
    ) -> Result<Option<Comment>> {
        let updated = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, media = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $4 AND soft_delete IS NULL
            RETURNING id, post_id, user_id, content, root_id, media, version, created_at, updated_at
            "#,
        )
        .bind(comment.id)
        .bind(&comment.content)
        .bind(Json(&comment.media))
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_detaching_replies(&self, comment_id: CommentId) -> Result<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let post_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            UPDATE comments
            SET soft_delete = NOW()
            WHERE id = $1 AND soft_delete IS NULL
            RETURNING post_id
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(post_id) = post_id else {
            tx.rollback().await?;
            return Ok(None);
        };

        let detached = sqlx::query(
            "UPDATE comments SET root_id = NULL, updated_at = NOW() WHERE root_id = $1",
        )
        .bind(comment_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            "UPDATE posts SET comment_count = GREATEST(comment_count - 1, 0) WHERE id = $1",
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(detached))
    }
}
