/// Social graph gate - block-aware permission checks
///
/// An actor may act on a target unless the target has blocked the actor.
/// The relation is directed: A blocking B does not stop A from acting on B.
use crate::db::BlockRepository;
use crate::error::{AppError, Result};
use crate::models::UserId;
use std::sync::Arc;

#[derive(Clone)]
pub struct SocialGraphGate {
    blocks: Arc<dyn BlockRepository>,
}

impl SocialGraphGate {
    pub fn new(blocks: Arc<dyn BlockRepository>) -> Self {
        Self { blocks }
    }

    /// `true` unless `target` has blocked `actor`. Self-action is always allowed.
    pub async fn can_act_on(&self, actor_id: UserId, target_id: UserId) -> Result<bool> {
        if actor_id == target_id {
            return Ok(true);
        }

        let blocked = self.blocks.block_exists(target_id, actor_id).await?;
        Ok(!blocked)
    }

    /// Fails with `Forbidden` when the target has blocked the actor.
    pub async fn ensure_can_act_on(&self, actor_id: UserId, target_id: UserId) -> Result<()> {
        if self.can_act_on(actor_id, target_id).await? {
            Ok(())
        } else {
            tracing::debug!(%actor_id, %target_id, "action rejected by block");
            Err(AppError::Forbidden(
                "You are not allowed to interact with this user".to_string(),
            ))
        }
    }
}

/// Mutations of an existing entity are reserved to its owner.
pub fn ensure_owner(actor_id: UserId, owner_id: UserId, entity: &str) -> Result<()> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Only the owner can modify this {}",
            entity
        )))
    }
}
