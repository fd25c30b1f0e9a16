//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{Harvester, SearchOptions, YouTubeClient};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Run the search command.
pub async fn run_search(
    query: &str,
    limit: u32,
    options: SearchOptions,
    settings: &Settings,
) -> Result<()> {
    let client = Arc::new(YouTubeClient::from_env()?);
    let harvester = Harvester::new(client)
        .with_page_delay(Duration::from_millis(settings.youtube.page_delay_ms));

    let results = harvester.search_videos(query, limit, &options).await?;

    let items = results
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        Output::info("No matching videos found.");
        return Ok(());
    }

    Output::header(&format!("Search results for '{}' ({})", query, items.len()));

    for item in &items {
        let id = item
            .pointer("/id/videoId")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let title = item
            .pointer("/snippet/title")
            .and_then(|v| v.as_str())
            .unwrap_or("Untitled");
        let channel = item
            .pointer("/snippet/channelTitle")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        let description = item
            .pointer("/snippet/description")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        Output::search_result(title, id, channel, description);
    }

    Ok(())
}
