//! In-memory video store.
//!
//! Tracks identity sets in HashMaps, which makes it a convenient collaborator
//! for idempotency and batching tests. `fail_after_batches` injects a storage
//! failure on the Nth comment upsert call.

use super::{CommentRecord, VideoRecord, VideoStore};
use crate::error::{Result, VidharvestError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// HashMap-backed store for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryVideoStore {
    videos: Mutex<HashMap<String, VideoRecord>>,
    comments: Mutex<HashMap<String, CommentRecord>>,
    upsert_calls: Mutex<usize>,
    fail_after_batches: Option<usize>,
}

impl MemoryVideoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose comment upserts fail once `n` batches have
    /// completed (the failing call is batch index `n`, zero-based).
    pub fn failing_after_batches(n: usize) -> Self {
        Self {
            fail_after_batches: Some(n),
            ..Self::default()
        }
    }

    /// Number of comment upsert calls made so far.
    pub fn upsert_call_count(&self) -> usize {
        *self.upsert_calls.lock().unwrap()
    }

    /// Number of distinct stored comment identities.
    pub fn stored_comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }

    /// Number of distinct stored video identities.
    pub fn stored_video_count(&self) -> usize {
        self.videos.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn create_video_record(&self, video: &VideoRecord) -> Result<bool> {
        let mut videos = self.videos.lock().unwrap();
        if videos.contains_key(&video.id) {
            return Ok(false);
        }
        videos.insert(video.id.clone(), video.clone());
        Ok(true)
    }

    async fn upsert_comment_records(&self, comments: &[CommentRecord]) -> Result<usize> {
        let calls = {
            let mut calls = self.upsert_calls.lock().unwrap();
            let current = *calls;
            *calls += 1;
            current
        };

        if let Some(limit) = self.fail_after_batches {
            if calls >= limit {
                return Err(VidharvestError::Config(
                    "injected store failure".to_string(),
                ));
            }
        }

        let mut stored = self.comments.lock().unwrap();
        for comment in comments {
            stored.insert(comment.id.clone(), comment.clone());
        }
        Ok(comments.len())
    }

    async fn get_video(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        Ok(self.videos.lock().unwrap().get(video_id).cloned())
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        Ok(self.videos.lock().unwrap().values().cloned().collect())
    }

    async fn comment_count(&self, video_id: &str) -> Result<usize> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.video_id == video_id)
            .count())
    }
}
