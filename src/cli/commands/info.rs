//! Info command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{Harvester, YouTubeClient};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Run the info command.
pub async fn run_info(url: &str, settings: &Settings) -> Result<()> {
    let client = Arc::new(YouTubeClient::from_env()?);
    let harvester = Harvester::new(client)
        .with_page_delay(Duration::from_millis(settings.youtube.page_delay_ms));

    let video = harvester.get_video_info(url).await?;

    Output::header(&video.title);
    Output::kv("ID", &video.id);
    Output::kv("Channel", &video.channel_title);
    if let Some(published) = video.published_at {
        Output::kv("Published", &published.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    Output::kv("Duration", &video.duration);
    Output::kv("Views", &video.view_count.to_string());
    Output::kv("Likes", &video.like_count.to_string());
    Output::kv("Comments", &video.comment_count.to_string());
    if !video.description.is_empty() {
        println!("\n{}", video.description);
    }

    Ok(())
}
