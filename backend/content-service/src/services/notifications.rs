/// Notification fan-out
///
/// A domain event becomes one persisted notification record, then is pushed
/// to every live channel of the recipient. Persistence happens before any
/// push, so a client that misses the push still finds the record later.
/// Pushes are independent: a slow or closed channel never holds up the
/// others or the caller.
use crate::db::NotificationRepository;
use crate::error::{AppError, Result};
use crate::metrics::{record_live_push, record_notification};
use crate::models::{DomainEvent, Notification, UserId};
use crate::websocket::{PresenceRegistry, PushError, WebSocketMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;

const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page to `limit` in 1..=100 and a non-negative `offset`.
pub fn page_bounds(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    presence: PresenceRegistry,
    push_timeout: Duration,
    tracker: TaskTracker,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        presence: PresenceRegistry,
        push_timeout: Duration,
    ) -> Self {
        Self {
            notifications,
            presence,
            push_timeout,
            tracker: TaskTracker::new(),
        }
    }

    /// Persist the notification for `event` and start pushing it to the
    /// recipient's live channels. Returns once the record is stored.
    pub async fn dispatch(&self, event: DomainEvent) -> Result<Notification> {
        let notification = event.into_notification();
        let kind = notification.payload.kind();

        let stored = match self.notifications.insert(&notification).await {
            Ok(stored) => {
                record_notification(kind, "persisted");
                stored
            }
            Err(err) => {
                record_notification(kind, "failed");
                return Err(AppError::Delivery(format!(
                    "failed to persist {} notification for {}: {}",
                    kind, notification.recipient_id, err
                )));
            }
        };

        let channels = self.push_live(&stored);
        tracing::debug!(
            notification_id = %stored.id,
            recipient_id = %stored.recipient_id,
            kind,
            channels,
            "notification dispatched"
        );

        Ok(stored)
    }

    /// Dispatch and absorb failures. Content mutations call this so that a
    /// notification problem never fails the mutation itself.
    pub async fn notify(&self, event: DomainEvent) -> Option<Notification> {
        let recipient_id = event.recipient_id();
        match self.dispatch(event).await {
            Ok(notification) => Some(notification),
            Err(err) => {
                tracing::error!(%recipient_id, "notification delivery failed: {}", err);
                None
            }
        }
    }

    /// Push a stored notification to each live channel of its recipient, one
    /// tracked task per channel. Returns the number of channels targeted.
    pub fn push_live(&self, notification: &Notification) -> usize {
        let recipient_id = notification.recipient_id;
        let channels = self.presence.channels_for(recipient_id);
        if channels.is_empty() {
            return 0;
        }

        let frame = match WebSocketMessage::notification(notification.clone()).to_json() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(notification_id = %notification.id, "failed to encode notification frame: {}", err);
                return 0;
            }
        };

        let targeted = channels.len();
        for channel in channels {
            let frame = frame.clone();
            let presence = self.presence.clone();
            let timeout = self.push_timeout;

            self.tracker.spawn(async move {
                match channel.push(frame, timeout).await {
                    Ok(()) => record_live_push("delivered"),
                    Err(PushError::Closed) => {
                        record_live_push("closed");
                        presence.unregister(recipient_id, &channel);
                    }
                    Err(err) => {
                        record_live_push("timeout");
                        tracing::warn!(%recipient_id, channel_id = ?channel.id(), "live push dropped: {}", err);
                    }
                }
            });
        }

        targeted
    }

    /// Stored notifications for a recipient, newest first.
    pub async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        let (limit, offset) = page_bounds(limit, offset);

        self.notifications
            .list_for_recipient(recipient_id, limit, offset)
            .await
    }

    /// Wait for in-flight pushes to finish.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
