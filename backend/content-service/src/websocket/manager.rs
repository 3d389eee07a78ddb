/// Presence registry
///
/// Maps a user to the set of live real-time channels (one per connected
/// device or tab). State is process-local and rebuilt as clients reconnect:
/// created once at startup, cleared at shutdown, and handed to the
/// components that need it rather than reached through a global.
use crate::models::UserId;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use uuid::Uuid;

/// Unique identifier for a live channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(Uuid);

impl ChannelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("channel closed")]
    Closed,
    #[error("push timed out after {0:?}")]
    Timeout(Duration),
}

/// Sending half of a live channel. Equality and hashing use the id only.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    id: ChannelId,
    sender: mpsc::Sender<String>,
}

impl ChannelHandle {
    /// Open a channel with a bounded outbound buffer.
    pub fn open(buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (
            Self {
                id: ChannelId::new(),
                sender,
            },
            receiver,
        )
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Push a serialized frame, waiting at most `timeout` for buffer space.
    pub async fn push(&self, payload: String, timeout: Duration) -> Result<(), PushError> {
        self.sender
            .send_timeout(payload, timeout)
            .await
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => PushError::Timeout(timeout),
                SendTimeoutError::Closed(_) => PushError::Closed,
            })
    }
}

impl PartialEq for ChannelHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ChannelHandle {}

impl Hash for ChannelHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Concurrent user -> channels map. Entries are independent per user, so
/// connects, disconnects and lookups for different users never contend.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    channels: Arc<DashMap<UserId, HashSet<ChannelHandle>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel for a user. Idempotent: returns `false` when the
    /// channel was already registered.
    pub fn register(&self, user_id: UserId, channel: ChannelHandle) -> bool {
        let inserted = self.channels.entry(user_id).or_default().insert(channel);

        tracing::debug!(
            %user_id,
            inserted,
            "channel registered, user has {} live channel(s)",
            self.connection_count(user_id)
        );

        inserted
    }

    /// Remove one channel of a user. Idempotent: returns `false` when it was
    /// not registered.
    pub fn unregister(&self, user_id: UserId, channel: &ChannelHandle) -> bool {
        let removed = {
            let Some(mut set) = self.channels.get_mut(&user_id) else {
                return false;
            };
            set.remove(channel)
        };

        self.channels.remove_if(&user_id, |_, set| set.is_empty());

        removed
    }

    /// Snapshot of the user's live channels
    pub fn channels_for(&self, user_id: UserId) -> HashSet<ChannelHandle> {
        self.channels
            .get(&user_id)
            .map(|set| set.clone())
            .unwrap_or_default()
    }

    pub fn connection_count(&self, user_id: UserId) -> usize {
        self.channels.get(&user_id).map(|set| set.len()).unwrap_or(0)
    }

    pub fn total_connections(&self) -> usize {
        self.channels.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn connected_users_count(&self) -> usize {
        self.channels.len()
    }

    /// Drop every registration (graceful shutdown)
    pub fn clear(&self) {
        self.channels.clear();
    }
}
