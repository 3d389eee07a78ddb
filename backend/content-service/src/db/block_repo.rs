use super::BlockRepository;
use crate::error::Result;
use crate::models::UserId;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgBlockRepository {
    pool: PgPool,
}

impl PgBlockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for PgBlockRepository {
    /// `blocks` holds at most one row per ordered (blocker, blocked) pair
    async fn block_exists(&self, blocker_id: UserId, blocked_id: UserId) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blocks
                WHERE blocker_id = $1 AND blocked_id = $2
            )
            "#,
        )
        .bind(blocker_id)
        .bind(blocked_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
