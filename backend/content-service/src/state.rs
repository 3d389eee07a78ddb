/// Composition root shared by HTTP handlers and WebSocket sessions
use crate::config::{MediaConfig, RealtimeConfig};
use crate::db::{BlockRepository, CommentRepository, NotificationRepository, PostRepository};
use crate::services::{
    CommentService, MediaOrchestrator, NotificationDispatcher, PostService, SocialGraphGate,
};
use crate::storage::ObjectStorage;
use crate::websocket::PresenceRegistry;
use std::sync::Arc;

/// Collaborators the pipeline is wired from
pub struct Collaborators {
    pub blocks: Arc<dyn BlockRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub storage: Arc<dyn ObjectStorage>,
}

#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub notifications: NotificationDispatcher,
    pub media: MediaOrchestrator,
    pub presence: PresenceRegistry,
    pub realtime: RealtimeConfig,
}

impl AppState {
    /// Build every service around one presence registry.
    pub fn new(
        collaborators: Collaborators,
        media_config: &MediaConfig,
        realtime: RealtimeConfig,
    ) -> Self {
        let presence = PresenceRegistry::new();
        let gate = SocialGraphGate::new(collaborators.blocks);
        let media = MediaOrchestrator::new(collaborators.storage, media_config);
        let notifications = NotificationDispatcher::new(
            collaborators.notifications,
            presence.clone(),
            realtime.push_timeout(),
        );

        let posts = PostService::new(
            Arc::clone(&collaborators.posts),
            media.clone(),
            media_config.max_attachments,
        );
        let comments = CommentService::new(
            collaborators.comments,
            collaborators.posts,
            gate,
            media.clone(),
            notifications.clone(),
            media_config.max_attachments,
        );

        Self {
            posts,
            comments,
            notifications,
            media,
            presence,
            realtime,
        }
    }

    /// Graceful shutdown: drop live channels, then wait for background
    /// discards and pushes.
    pub async fn shutdown(&self) {
        let channels = self.presence.total_connections();
        self.presence.clear();
        self.media.drain().await;
        self.notifications.drain().await;
        tracing::info!(channels, "content-service background work drained");
    }
}
