//! Batched persistence of harvested records.
//!
//! The video record goes first; comments follow in fixed-size chunks so peak
//! memory stays bounded no matter how many comments were harvested. Upsert
//! idempotency makes retry-from-start safe after a mid-stream failure.

use crate::error::{Result, VidharvestError};
use crate::store::{CommentRecord, VideoRecord, VideoStore};
use std::sync::Arc;
use tracing::debug;

/// Comments written per upsert call.
pub const COMMENT_BATCH_SIZE: usize = 20;

/// Funnels a harvested collection into the store in bounded batches.
pub struct BatchedPersister {
    store: Arc<dyn VideoStore>,
    batch_size: usize,
}

impl BatchedPersister {
    /// Create a persister with the default batch size.
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        Self {
            store,
            batch_size: COMMENT_BATCH_SIZE,
        }
    }

    /// Override the batch size (mostly for tests).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        self.batch_size = batch_size;
        self
    }

    /// Persist a video record and its comments.
    ///
    /// The video is created first (idempotently); if that fails nothing else
    /// is attempted. Comments are then upserted chunk by chunk in order.
    /// Returns the number of comments processed; a failure partway surfaces
    /// `Persistence` carrying the count from completed chunks, and already
    /// written chunks are not rolled back.
    pub async fn persist(&self, video: &VideoRecord, comments: &[CommentRecord]) -> Result<usize> {
        self.store
            .create_video_record(video)
            .await
            .map_err(|e| VidharvestError::Persistence {
                processed: 0,
                message: format!("failed to create video record for {}: {}", video.id, e),
            })?;

        let mut processed = 0;
        for chunk in comments.chunks(self.batch_size) {
            match self.store.upsert_comment_records(chunk).await {
                Ok(written) => {
                    processed += written;
                    debug!("Persisted comment batch ({} so far)", processed);
                }
                Err(e) => {
                    return Err(VidharvestError::Persistence {
                        processed,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryVideoStore;

    fn sample_video() -> VideoRecord {
        VideoRecord {
            id: "vid1".to_string(),
            title: "Video".to_string(),
            url: "https://youtu.be/vid1".to_string(),
            description: String::new(),
            channel_title: "Channel".to_string(),
            published_at: None,
            duration: "PT1M".to_string(),
            view_count: 0,
            like_count: 0,
            comment_count: 0,
        }
    }

    fn comments(n: usize) -> Vec<CommentRecord> {
        (0..n)
            .map(|i| CommentRecord {
                id: format!("c{}", i),
                video_id: "vid1".to_string(),
                text: format!("comment {}", i),
                like_count: 0,
                reply_count: 0,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batch_count_is_ceil_of_total_over_size() {
        let store = Arc::new(MemoryVideoStore::new());
        let persister = BatchedPersister::new(store.clone()).with_batch_size(20);

        let processed = persister.persist(&sample_video(), &comments(47)).await.unwrap();

        assert_eq!(processed, 47);
        // ceil(47 / 20) = 3 upsert calls
        assert_eq!(store.upsert_call_count(), 3);
        assert_eq!(store.stored_comment_count(), 47);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_batch_size() {
        let store = Arc::new(MemoryVideoStore::new());
        let persister = BatchedPersister::new(store.clone()).with_batch_size(10);

        let processed = persister.persist(&sample_video(), &comments(30)).await.unwrap();

        assert_eq!(processed, 30);
        assert_eq!(store.upsert_call_count(), 3);
    }

    #[tokio::test]
    async fn test_no_comments_still_persists_video() {
        let store = Arc::new(MemoryVideoStore::new());
        let persister = BatchedPersister::new(store.clone());

        let processed = persister.persist(&sample_video(), &[]).await.unwrap();

        assert_eq!(processed, 0);
        assert_eq!(store.upsert_call_count(), 0);
        assert_eq!(store.stored_video_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_mid_stream_reports_completed_count() {
        // Fails on batch index 2, so batches 0 and 1 (2 * 10 comments) land.
        let store = Arc::new(MemoryVideoStore::failing_after_batches(2));
        let persister = BatchedPersister::new(store.clone()).with_batch_size(10);

        let err = persister.persist(&sample_video(), &comments(35)).await.unwrap_err();

        match err {
            VidharvestError::Persistence { processed, .. } => assert_eq!(processed, 20),
            other => panic!("expected Persistence error, got {:?}", other),
        }
        // Completed chunks are not rolled back
        assert_eq!(store.stored_comment_count(), 20);
    }

    #[tokio::test]
    async fn test_repeat_persist_is_idempotent() {
        let store = Arc::new(MemoryVideoStore::new());
        let persister = BatchedPersister::new(store.clone());
        let video = sample_video();
        let batch = comments(25);

        persister.persist(&video, &batch).await.unwrap();
        persister.persist(&video, &batch).await.unwrap();

        assert_eq!(store.stored_video_count(), 1);
        assert_eq!(store.stored_comment_count(), 25);
    }
}
