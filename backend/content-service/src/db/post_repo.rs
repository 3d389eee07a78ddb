use super::PostRepository;
use crate::error::Result;
use crate::models::{Post, PostId};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    /// Find a post by ID (excluding soft-deleted posts)
    async fn find_by_id(&self, post_id: PostId) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, content, media, view_count, reaction_count, comment_count,
                   version, created_at, updated_at
            FROM posts
            WHERE id = $1 AND soft_delete IS NULL
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert(&self, post: &Post) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, user_id, content, media, view_count, reaction_count,
                               comment_count, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, 0, 0, $5, $6, $6)
            RETURNING id, user_id, content, media, view_count, reaction_count, comment_count,
                      version, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(post.owner_id)
        .bind(&post.content)
        .bind(Json(&post.media))
        .bind(post.version)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update(&self, post: &Post, expected_version: i32) -> Result<Option<Post>> {
        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = $2, media = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $4 AND soft_delete IS NULL
            RETURNING id, user_id, content, media, view_count, reaction_count, comment_count,
                      version, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(Json(&post.media))
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
