use super::{CommentId, NotificationId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Variant-specific notification data, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Someone commented on the recipient's post
    Comment {
        post_id: PostId,
        comment_id: CommentId,
    },
    /// A friend request from the recipient was accepted
    Friend,
    /// Someone reacted to the recipient's post
    React {
        post_id: PostId,
        reaction_type: String,
    },
    /// Platform message
    System { message: String },
}

impl NotificationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::Comment { .. } => "comment",
            NotificationPayload::Friend => "friend",
            NotificationPayload::React { .. } => "react",
            NotificationPayload::System { .. } => "system",
        }
    }
}

/// Persisted notification record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,

    /// Recipient user ID
    pub recipient_id: UserId,

    /// User whose action produced the notification (none for system)
    pub actor_id: Option<UserId>,

    pub payload: NotificationPayload,

    /// Read status, toggled only by the read path
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

/// Events emitted by content mutations and social workflows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    CommentCreated {
        recipient_id: UserId,
        actor_id: UserId,
        post_id: PostId,
        comment_id: CommentId,
    },
    ReactionCreated {
        recipient_id: UserId,
        actor_id: UserId,
        post_id: PostId,
        reaction_type: String,
    },
    FriendAccepted {
        recipient_id: UserId,
        actor_id: UserId,
    },
    System {
        recipient_id: UserId,
        message: String,
    },
}

impl DomainEvent {
    pub fn recipient_id(&self) -> UserId {
        match self {
            DomainEvent::CommentCreated { recipient_id, .. }
            | DomainEvent::ReactionCreated { recipient_id, .. }
            | DomainEvent::FriendAccepted { recipient_id, .. }
            | DomainEvent::System { recipient_id, .. } => *recipient_id,
        }
    }

    /// Build the notification record this event produces.
    pub fn into_notification(self) -> Notification {
        let (recipient_id, actor_id, payload) = match self {
            DomainEvent::CommentCreated {
                recipient_id,
                actor_id,
                post_id,
                comment_id,
            } => (
                recipient_id,
                Some(actor_id),
                NotificationPayload::Comment {
                    post_id,
                    comment_id,
                },
            ),
            DomainEvent::ReactionCreated {
                recipient_id,
                actor_id,
                post_id,
                reaction_type,
            } => (
                recipient_id,
                Some(actor_id),
                NotificationPayload::React {
                    post_id,
                    reaction_type,
                },
            ),
            DomainEvent::FriendAccepted {
                recipient_id,
                actor_id,
            } => (recipient_id, Some(actor_id), NotificationPayload::Friend),
            DomainEvent::System {
                recipient_id,
                message,
            } => (recipient_id, None, NotificationPayload::System { message }),
        };

        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            actor_id,
            payload,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
