/// Media orchestrator - concurrent upload and best-effort cleanup of media
///
/// Uploads are fail-fast: the first failure aborts the batch, and anything
/// that was (or later turns out to be) stored for it is discarded in the
/// background. Discards never fail the caller; they report how many deletions
/// the storage backend confirmed and log the rest.
use crate::config::MediaConfig;
use crate::error::{AppError, Result};
use crate::metrics::{record_media_discard, record_media_upload};
use crate::models::{classify, ClassifiedMedia, MediaRef};
use crate::storage::{ObjectStorage, StorageError, StoredObject};
use bytes::Bytes;
use futures::future::join_all;
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use resilience::{with_timeout_result, TimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

type UploadOutcome = (
    usize,
    std::result::Result<StoredObject, TimeoutError<StorageError>>,
);

#[derive(Clone)]
pub struct MediaOrchestrator {
    storage: Arc<dyn ObjectStorage>,
    upload_timeout: Duration,
    discard_timeout: Duration,
    tracker: TaskTracker,
}

impl MediaOrchestrator {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: &MediaConfig) -> Self {
        Self {
            storage,
            upload_timeout: config.upload_timeout(),
            discard_timeout: config.discard_timeout(),
            tracker: TaskTracker::new(),
        }
    }

    /// Upload every payload concurrently. References come back in input order.
    pub async fn upload(&self, blobs: Vec<Bytes>) -> Result<Vec<MediaRef>> {
        if blobs.is_empty() {
            return Ok(Vec::new());
        }

        let total = blobs.len();
        let mut pending: FuturesUnordered<_> = blobs
            .into_iter()
            .enumerate()
            .map(|(index, blob)| {
                let storage = Arc::clone(&self.storage);
                let timeout = self.upload_timeout;
                async move { (index, with_timeout_result(timeout, storage.put(blob)).await) }
            })
            .collect();

        let mut slots: Vec<Option<MediaRef>> = vec![None; total];

        while let Some((index, outcome)) = pending.next().await {
            match outcome {
                Ok(stored) => {
                    record_media_upload("success");
                    slots[index] = Some(stored.into());
                }
                Err(err) => {
                    record_media_upload(if err.is_elapsed() { "timeout" } else { "failure" });
                    tracing::warn!(index, total, "media upload failed, aborting batch: {}", err);

                    let stored: Vec<MediaRef> = slots.into_iter().flatten().collect();
                    self.abandon_batch(stored, pending);

                    return Err(AppError::Upload(format!(
                        "media {} of {} could not be stored: {}",
                        index + 1,
                        total,
                        err
                    )));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Stop waiting on a failed batch. Already stored objects, and any still
    /// in flight that complete later, are deleted in the background.
    fn abandon_batch<S>(&self, mut stored: Vec<MediaRef>, mut in_flight: S)
    where
        S: Stream<Item = UploadOutcome> + Send + Unpin + 'static,
    {
        let this = self.clone();
        self.tracker.spawn(async move {
            while let Some((_, outcome)) = in_flight.next().await {
                if let Ok(late) = outcome {
                    stored.push(late.into());
                }
            }

            if stored.is_empty() {
                return 0;
            }
            this.discard(stored).await
        });
    }

    /// Delete each reference concurrently, each call under the discard bound.
    /// Returns the number of deletions the backend confirmed.
    pub async fn discard(&self, refs: Vec<MediaRef>) -> usize {
        if refs.is_empty() {
            return 0;
        }

        let attempts = refs.iter().map(|media| async move {
            let outcome = with_timeout_result(
                self.discard_timeout,
                self.storage.delete(&media.url, media.kind),
            )
            .await;
            (media, outcome)
        });

        let mut confirmed = 0;
        for (media, outcome) in join_all(attempts).await {
            match outcome {
                Ok(true) => {
                    record_media_discard("deleted");
                    confirmed += 1;
                }
                Ok(false) => {
                    record_media_discard("unconfirmed");
                    tracing::warn!(url = %media.url, kind = %media.kind, "media deletion not confirmed");
                }
                Err(err) => {
                    record_media_discard(if err.is_elapsed() { "timeout" } else { "failure" });
                    tracing::warn!(url = %media.url, kind = %media.kind, "media deletion failed: {}", err);
                }
            }
        }

        tracing::debug!(requested = refs.len(), confirmed, "media discard finished");
        confirmed
    }

    /// Run `discard` in the background. The task is tracked so `drain` waits
    /// for it at shutdown.
    pub fn schedule_discard(&self, refs: Vec<MediaRef>) -> JoinHandle<usize> {
        let this = self.clone();
        self.tracker.spawn(async move { this.discard(refs).await })
    }

    pub fn classify(&self, refs: &[MediaRef]) -> ClassifiedMedia {
        classify(refs)
    }

    /// Number of background discards still running
    pub fn pending_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every background discard scheduled so far.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
