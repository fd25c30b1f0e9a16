//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::{SqliteVideoStore, VideoStore};
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: &Settings) -> Result<()> {
    let store = SqliteVideoStore::new(&settings.db_path())?;

    let videos = store.list_videos().await?;
    if videos.is_empty() {
        Output::info("No videos harvested yet. Use 'vidharvest load <url>' to add one.");
        return Ok(());
    }

    Output::header(&format!("Harvested videos ({})", videos.len()));
    println!();

    let mut total_comments = 0;
    for video in &videos {
        let comments = store.comment_count(&video.id).await?;
        total_comments += comments;
        Output::video_line(&video.title, &video.id, comments, video.view_count);
    }

    println!();
    Output::kv("Total videos", &videos.len().to_string());
    Output::kv("Total comments", &total_comments.to_string());

    Ok(())
}
