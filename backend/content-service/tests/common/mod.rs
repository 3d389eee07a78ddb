//! In-memory collaborators for integration tests
//!
//! Every repository trait and the object storage capability get a
//! process-local implementation that records what the pipeline did to it,
//! so tests can assert on persisted rows, uploads and deletions without
//! Postgres or S3.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use content_service::config::{MediaConfig, RealtimeConfig};
use content_service::db::{
    BlockRepository, CommentRepository, NotificationRepository, PostRepository,
};
use content_service::models::{
    Comment, CommentId, MediaKind, Notification, Post, PostId, UserId,
};
use content_service::storage::{sniff_media, ObjectStorage, StorageError, StoredObject};
use content_service::{AppError, AppState, Collaborators, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Minimal PNG signature; sniffed as image/png
pub fn png() -> Bytes {
    Bytes::from_static(&[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ])
}

/// Minimal MP4 header; sniffed as video/mp4
pub fn mp4() -> Bytes {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x18];
    bytes.extend_from_slice(b"ftypmp42");
    bytes.extend_from_slice(&[0; 12]);
    Bytes::from(bytes)
}

/// Not a media payload; storage refuses it
pub fn text_payload() -> Bytes {
    Bytes::from_static(b"definitely not an image")
}

// =====================================================================
// Relational store
// =====================================================================

#[derive(Default)]
pub struct InMemoryBlocks {
    edges: Mutex<HashSet<(UserId, UserId)>>,
}

impl InMemoryBlocks {
    pub fn block(&self, blocker_id: UserId, blocked_id: UserId) {
        self.edges.lock().unwrap().insert((blocker_id, blocked_id));
    }
}

#[async_trait]
impl BlockRepository for InMemoryBlocks {
    async fn block_exists(&self, blocker_id: UserId, blocked_id: UserId) -> Result<bool> {
        Ok(self
            .edges
            .lock()
            .unwrap()
            .contains(&(blocker_id, blocked_id)))
    }
}

#[derive(Default)]
pub struct InMemoryPosts {
    rows: Mutex<HashMap<PostId, Post>>,
    fail_writes: AtomicBool,
    /// Version bump applied behind the service's back on the next update
    race_next_update: AtomicBool,
}

impl InMemoryPosts {
    pub fn get(&self, post_id: PostId) -> Option<Post> {
        self.rows.lock().unwrap().get(&post_id).cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Simulate a concurrent writer that commits between load and persist.
    pub fn race_next_update(&self) {
        self.race_next_update.store(true, Ordering::SeqCst);
    }

    fn adjust_comment_count(&self, post_id: PostId, delta: i64) {
        if let Some(post) = self.rows.lock().unwrap().get_mut(&post_id) {
            post.comment_count += delta;
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn find_by_id(&self, post_id: PostId) -> Result<Option<Post>> {
        Ok(self.get(post_id))
    }

    async fn insert(&self, post: &Post) -> Result<Post> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("posts table unavailable".into()));
        }
        self.rows.lock().unwrap().insert(post.id, post.clone());
        Ok(post.clone())
    }

    async fn update(&self, post: &Post, expected_version: i32) -> Result<Option<Post>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("posts table unavailable".into()));
        }

        let mut rows = self.rows.lock().unwrap();
        let Some(stored) = rows.get_mut(&post.id) else {
            return Ok(None);
        };

        if self.race_next_update.swap(false, Ordering::SeqCst) {
            stored.version += 1;
        }

        if stored.version != expected_version {
            return Ok(None);
        }

        stored.content = post.content.clone();
        stored.media = post.media.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }
}

pub struct InMemoryComments {
    rows: Mutex<HashMap<CommentId, Comment>>,
    posts: Arc<InMemoryPosts>,
    fail_writes: AtomicBool,
    /// Deleted right after its next lookup, as if another request won the race
    delete_after_read: Mutex<Option<CommentId>>,
}

impl InMemoryComments {
    pub fn new(posts: Arc<InMemoryPosts>) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            posts,
            fail_writes: AtomicBool::new(false),
            delete_after_read: Mutex::new(None),
        }
    }

    /// Simulate a concurrent delete that commits just after `comment_id` is read.
    pub fn delete_after_next_read(&self, comment_id: CommentId) {
        *self.delete_after_read.lock().unwrap() = Some(comment_id);
    }

    pub fn get(&self, comment_id: CommentId) -> Option<Comment> {
        self.rows.lock().unwrap().get(&comment_id).cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn find_by_id(&self, comment_id: CommentId) -> Result<Option<Comment>> {
        let found = self.get(comment_id);

        let race = {
            let mut pending = self.delete_after_read.lock().unwrap();
            if *pending == Some(comment_id) {
                pending.take()
            } else {
                None
            }
        };
        if race.is_some() {
            self.delete_detaching_replies(comment_id).await?;
        }

        Ok(found)
    }

    async fn insert(&self, comment: &Comment) -> Result<Comment> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("comments table unavailable".into()));
        }

        {
            let mut rows = self.rows.lock().unwrap();
            if let Some(root_id) = comment.root_id {
                let root_alive = rows
                    .get(&root_id)
                    .map_or(false, |root| root.post_id == comment.post_id);
                if !root_alive {
                    return Err(AppError::NotFound(format!(
                        "Root comment {} not found",
                        root_id
                    )));
                }
            }
            rows.insert(comment.id, comment.clone());
        }
        self.posts.adjust_comment_count(comment.post_id, 1);
        Ok(comment.clone())
    }

    async fn update(&self, comment: &Comment, expected_version: i32) -> Result<Option<Comment>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("comments table unavailable".into()));
        }

        let mut rows = self.rows.lock().unwrap();
        let Some(stored) = rows.get_mut(&comment.id) else {
            return Ok(None);
        };
        if stored.version != expected_version {
            return Ok(None);
        }

        stored.content = comment.content.clone();
        stored.media = comment.media.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_detaching_replies(&self, comment_id: CommentId) -> Result<Option<u64>> {
        let (post_id, detached) = {
            let mut rows = self.rows.lock().unwrap();
            let Some(removed) = rows.remove(&comment_id) else {
                return Ok(None);
            };

            let mut detached = 0;
            for reply in rows.values_mut() {
                if reply.root_id == Some(comment_id) {
                    reply.root_id = None;
                    detached += 1;
                }
            }
            (removed.post_id, detached)
        };

        self.posts.adjust_comment_count(post_id, -1);
        Ok(Some(detached))
    }
}

#[derive(Default)]
pub struct InMemoryNotifications {
    rows: Mutex<Vec<Notification>>,
    fail_writes: AtomicBool,
}

impl InMemoryNotifications {
    pub fn all(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }

    pub fn for_recipient(&self, recipient_id: UserId) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.recipient_id == recipient_id)
            .collect()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotifications {
    async fn insert(&self, notification: &Notification) -> Result<Notification> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("notifications table unavailable".into()));
        }
        self.rows.lock().unwrap().push(notification.clone());
        Ok(notification.clone())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        let mut rows = self.for_recipient(recipient_id);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

// =====================================================================
// Object storage
// =====================================================================

/// Sniffs payloads like the S3 adapter does and records every call.
#[derive(Default)]
pub struct RecordingStorage {
    puts: AtomicUsize,
    stored: Mutex<Vec<String>>,
    delete_calls: Mutex<Vec<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    hang_puts: AtomicBool,
    hang_deletes: AtomicBool,
}

impl RecordingStorage {
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored_urls(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn delete_count_for(&self, url: &str) -> usize {
        self.delete_calls()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }

    pub fn fail_delete_of(&self, url: &str) {
        self.failing_deletes.lock().unwrap().insert(url.to_string());
    }

    /// Every later `put` never completes.
    pub fn hang_puts(&self) {
        self.hang_puts.store(true, Ordering::SeqCst);
    }

    /// Every later `delete` is recorded, then never completes.
    pub fn hang_deletes(&self) {
        self.hang_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put(&self, blob: Bytes) -> std::result::Result<StoredObject, StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.hang_puts.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let (_, kind) = sniff_media(&blob)?;

        let url = format!("https://media.test/{}/{}", kind, Uuid::new_v4());
        self.stored.lock().unwrap().push(url.clone());
        Ok(StoredObject { url, kind })
    }

    async fn delete(&self, url: &str, _kind: MediaKind) -> std::result::Result<bool, StorageError> {
        self.delete_calls.lock().unwrap().push(url.to_string());
        if self.hang_deletes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing_deletes.lock().unwrap().contains(url) {
            return Err(StorageError::Request(format!("delete {} refused", url)));
        }
        Ok(true)
    }
}

// =====================================================================
// Harness
// =====================================================================

pub struct Harness {
    pub state: AppState,
    pub blocks: Arc<InMemoryBlocks>,
    pub posts: Arc<InMemoryPosts>,
    pub comments: Arc<InMemoryComments>,
    pub notifications: Arc<InMemoryNotifications>,
    pub storage: Arc<RecordingStorage>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_media(MediaConfig::default())
    }

    pub fn with_media(media: MediaConfig) -> Self {
        let blocks = Arc::new(InMemoryBlocks::default());
        let posts = Arc::new(InMemoryPosts::default());
        let comments = Arc::new(InMemoryComments::new(posts.clone()));
        let notifications = Arc::new(InMemoryNotifications::default());
        let storage = Arc::new(RecordingStorage::default());

        let state = AppState::new(
            Collaborators {
                blocks: blocks.clone(),
                posts: posts.clone(),
                comments: comments.clone(),
                notifications: notifications.clone(),
                storage: storage.clone(),
            },
            &media,
            RealtimeConfig {
                push_timeout_ms: 200,
                ..RealtimeConfig::default()
            },
        );

        Self {
            state,
            blocks,
            posts,
            comments,
            notifications,
            storage,
        }
    }

    /// Store a text post directly, bypassing the pipeline.
    pub async fn seed_post(&self, owner_id: UserId) -> Post {
        let post = Post::new(owner_id, "seeded post".to_string(), Vec::new());
        self.posts.insert(&post).await.unwrap()
    }

    /// Store a comment directly, bypassing the pipeline.
    pub async fn seed_comment(
        &self,
        post_id: PostId,
        author_id: UserId,
        root_id: Option<CommentId>,
    ) -> Comment {
        let comment = Comment::new(post_id, author_id, "seeded".to_string(), root_id, Vec::new());
        self.comments.insert(&comment).await.unwrap()
    }

    /// Wait for every background discard and push.
    pub async fn settle(&self) {
        self.state.media.drain().await;
        self.state.notifications.drain().await;
    }
}
