//! SQLite-backed video store.
//!
//! Videos use `INSERT OR IGNORE` so re-harvesting an already stored video is
//! not an error; comments use an `ON CONFLICT` upsert keyed by comment ID.

use super::{CommentRecord, VideoRecord, VideoStore};
use crate::error::{Result, VidharvestError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS videos (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT NOT NULL,
    channel_title TEXT NOT NULL,
    published_at TEXT,
    duration TEXT NOT NULL,
    view_count INTEGER NOT NULL,
    like_count INTEGER NOT NULL,
    comment_count INTEGER NOT NULL,
    harvested_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    video_id TEXT NOT NULL,
    text TEXT NOT NULL,
    like_count INTEGER NOT NULL,
    reply_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_video_id ON comments(video_id);
"#;

/// SQLite-based video store.
pub struct SqliteVideoStore {
    conn: Mutex<Connection>,
}

impl SqliteVideoStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite video store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| VidharvestError::Store(format!("Failed to acquire lock: {}", e)))
    }

    fn row_to_video(row: &rusqlite::Row<'_>) -> rusqlite::Result<VideoRecord> {
        let published_at: Option<String> = row.get("published_at")?;
        Ok(VideoRecord {
            id: row.get("id")?,
            title: row.get("title")?,
            url: row.get("url")?,
            description: row.get("description")?,
            channel_title: row.get("channel_title")?,
            published_at: published_at
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            duration: row.get("duration")?,
            view_count: row.get::<_, i64>("view_count")? as u64,
            like_count: row.get::<_, i64>("like_count")? as u64,
            comment_count: row.get::<_, i64>("comment_count")? as u64,
        })
    }
}

#[async_trait]
impl VideoStore for SqliteVideoStore {
    async fn create_video_record(&self, video: &VideoRecord) -> Result<bool> {
        let conn = self.lock()?;

        let inserted = conn.execute(
            r#"INSERT OR IGNORE INTO videos
               (id, title, url, description, channel_title, published_at, duration,
                view_count, like_count, comment_count, harvested_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
            params![
                video.id,
                video.title,
                video.url,
                video.description,
                video.channel_title,
                video.published_at.map(|dt| dt.to_rfc3339()),
                video.duration,
                video.view_count as i64,
                video.like_count as i64,
                video.comment_count as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if inserted == 0 {
            debug!("Video {} already stored, leaving existing record", video.id);
        }

        Ok(inserted > 0)
    }

    async fn upsert_comment_records(&self, comments: &[CommentRecord]) -> Result<usize> {
        if comments.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for comment in comments {
            tx.execute(
                r#"INSERT INTO comments (id, video_id, text, like_count, reply_count)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT(id) DO UPDATE SET
                       text = excluded.text,
                       like_count = excluded.like_count,
                       reply_count = excluded.reply_count"#,
                params![
                    comment.id,
                    comment.video_id,
                    comment.text,
                    comment.like_count as i64,
                    comment.reply_count as i64,
                ],
            )?;
        }

        tx.commit()?;
        debug!("Upserted {} comments", comments.len());

        Ok(comments.len())
    }

    async fn get_video(&self, video_id: &str) -> Result<Option<VideoRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT * FROM videos WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![video_id], Self::row_to_video)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT * FROM videos ORDER BY harvested_at DESC")?;
        let rows = stmt.query_map([], Self::row_to_video)?;

        let mut videos = Vec::new();
        for row in rows {
            videos.push(row?);
        }
        Ok(videos)
    }

    async fn comment_count(&self, video_id: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE video_id = ?1",
            params![video_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
