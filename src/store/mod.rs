//! Storage abstraction for harvested video data.
//!
//! Provides a trait-based interface over the database so the harvesting
//! pipeline can be tested against an in-memory fake.

mod memory;
mod sqlite;

pub use memory::MemoryVideoStore;
pub use sqlite::SqliteVideoStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a harvested video.
///
/// Built once per harvest from the upstream description payload and never
/// mutated afterwards. Counts default to zero when the upstream omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Platform video ID (e.g. `dQw4w9WgXcQ`).
    pub id: String,
    /// Video title.
    pub title: String,
    /// Source URL the harvest was requested with.
    pub url: String,
    /// Full description text.
    pub description: String,
    /// Publishing channel name.
    pub channel_title: String,
    /// Publication timestamp, if the upstream reported one.
    pub published_at: Option<DateTime<Utc>>,
    /// ISO-8601 duration as reported upstream (e.g. `PT3M33S`).
    pub duration: String,
    /// View count.
    pub view_count: u64,
    /// Like count.
    pub like_count: u64,
    /// Total comment count as reported upstream.
    pub comment_count: u64,
}

/// A single top-level comment on a video.
///
/// Created in batches during pagination and never mutated; persistence is
/// keyed by `id`, so re-harvesting the same video is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Platform comment ID.
    pub id: String,
    /// ID of the video this comment belongs to.
    pub video_id: String,
    /// Comment text body.
    pub text: String,
    /// Like count.
    pub like_count: u64,
    /// Number of replies to this comment.
    pub reply_count: u64,
}

/// Trait for video/comment store implementations.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Create a video record if it does not already exist.
    ///
    /// Returns `true` if a new row was inserted, `false` if the video was
    /// already present (not an error).
    async fn create_video_record(&self, video: &VideoRecord) -> Result<bool>;

    /// Insert-or-update a batch of comments, keyed by comment ID.
    ///
    /// Returns the number of comments written.
    async fn upsert_comment_records(&self, comments: &[CommentRecord]) -> Result<usize>;

    /// Look up a stored video by ID.
    async fn get_video(&self, video_id: &str) -> Result<Option<VideoRecord>>;

    /// List all stored videos.
    async fn list_videos(&self) -> Result<Vec<VideoRecord>>;

    /// Count stored comments for a video.
    async fn comment_count(&self, video_id: &str) -> Result<usize>;
}
