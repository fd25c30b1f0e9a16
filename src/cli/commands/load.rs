//! Load command implementation: harvest a video and persist it.

use crate::cli::Output;
use crate::config::Settings;
use crate::persist::BatchedPersister;
use crate::store::SqliteVideoStore;
use crate::youtube::{CommentOrder, Harvester, YouTubeClient};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Run the load command.
pub async fn run_load(
    url: &str,
    max_comments: i64,
    order: &str,
    settings: &Settings,
) -> Result<()> {
    let order: CommentOrder = order.parse().map_err(anyhow::Error::msg)?;

    let client = Arc::new(YouTubeClient::from_env()?);
    let harvester = Harvester::new(client)
        .with_page_delay(Duration::from_millis(settings.youtube.page_delay_ms));

    let store = Arc::new(SqliteVideoStore::new(&settings.db_path())?);
    let persister = BatchedPersister::new(store);

    let spinner = Output::spinner("Fetching video metadata...");
    let video = match harvester.get_video_info(url).await {
        Ok(video) => video,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to get video info: {}", e));
            return Err(e.into());
        }
    };

    spinner.set_message(format!("Harvesting up to {} comments...", max_comments));
    let harvest = harvester.extract_comments(url, max_comments, order).await;
    spinner.finish_and_clear();

    if !harvest.skipped.is_empty() {
        Output::warning(&format!(
            "Skipped {} malformed comment items",
            harvest.skipped.len()
        ));
    }

    let processed = persister.persist(&video, &harvest.comments).await?;

    Output::success(&format!(
        "Loaded '{}' with {} comments into the database.",
        video.title, processed
    ));

    // Partial progress is still persisted; surface the cutoff to the user.
    if let Some(e) = &harvest.error {
        Output::warning(&format!("Comment harvest stopped early: {}", e));
    }

    Ok(())
}
