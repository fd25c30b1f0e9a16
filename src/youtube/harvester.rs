//! Paginated harvesting of video metadata and top-level comments.

use super::api::{CommentOrder, CommentThreadItem, SearchOptions, VideoApi};
use super::url::extract_video_id;
use crate::error::{Result, VidharvestError};
use crate::store::{CommentRecord, VideoRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hard ceiling the upstream imposes on a single comment page.
const UPSTREAM_PAGE_CAP: u32 = 100;

/// Cooperative delay between comment pages. Not enforced by the upstream;
/// this is just pacing to stay polite under quota.
const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// Result of a comment harvest.
///
/// A harvest that hits an upstream failure mid-pagination keeps everything
/// collected so far and carries the error alongside, so the caller decides
/// whether partial progress is usable.
#[derive(Debug, Default)]
pub struct CommentHarvest {
    /// Comments collected, in upstream page order.
    pub comments: Vec<CommentRecord>,
    /// Reasons for individually skipped (malformed) items.
    pub skipped: Vec<String>,
    /// The upstream error that ended pagination early, if any.
    pub error: Option<VidharvestError>,
}

impl CommentHarvest {
    /// True when pagination was cut short by an upstream failure.
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

/// Decode a page of raw comment thread items, keeping what parses and
/// recording a reason for everything that does not.
fn decode_comment_items(items: &[Value], video_id: &str) -> (Vec<CommentRecord>, Vec<String>) {
    let mut kept = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<CommentThreadItem>(item.clone()) {
            Ok(thread) => {
                let top = thread.snippet.top_level_comment;
                kept.push(CommentRecord {
                    id: top.id,
                    video_id: video_id.to_string(),
                    text: top.snippet.text_display,
                    like_count: top.snippet.like_count,
                    reply_count: thread.snippet.total_reply_count,
                });
            }
            Err(e) => {
                skipped.push(format!("item {}: {}", index, e));
            }
        }
    }

    (kept, skipped)
}

/// Parse an upstream count field, defaulting to zero when absent or
/// malformed.
fn parse_count(raw: &Option<String>) -> u64 {
    raw.as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

/// Drives paginated requests against the upstream API.
pub struct Harvester {
    api: Arc<dyn VideoApi>,
    page_delay: Duration,
}

impl Harvester {
    /// Create a harvester over the given API client.
    pub fn new(api: Arc<dyn VideoApi>) -> Self {
        Self {
            api,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Override the inter-page pacing delay.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Fetch video metadata for a URL.
    ///
    /// Fails with `InvalidReference` when no video ID can be extracted and
    /// with `VideoNotFound` when the upstream reports zero matching items.
    /// Missing numeric statistics decode to zero rather than failing.
    pub async fn get_video_info(&self, video_url: &str) -> Result<VideoRecord> {
        let video_id = extract_video_id(video_url)
            .ok_or_else(|| VidharvestError::InvalidReference(video_url.to_string()))?;

        let response = self.api.video_details(&video_id).await?;
        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| VidharvestError::VideoNotFound(video_id.clone()))?;

        let published_at = DateTime::parse_from_rfc3339(&item.snippet.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        Ok(VideoRecord {
            id: video_id,
            title: item.snippet.title,
            url: video_url.to_string(),
            description: item.snippet.description,
            channel_title: item.snippet.channel_title,
            published_at,
            duration: item.content_details.duration,
            view_count: parse_count(&item.statistics.view_count),
            like_count: parse_count(&item.statistics.like_count),
            comment_count: parse_count(&item.statistics.comment_count),
        })
    }

    /// Extract up to `max_count` top-level comments for a URL.
    ///
    /// An unresolvable URL or a non-positive `max_count` yields an empty
    /// harvest without issuing any upstream request. Pages are sized at
    /// `min(100, remaining)`; pagination ends when the budget is reached,
    /// the upstream stops returning a page token, or an upstream error
    /// occurs (partial results are kept and returned with the error).
    pub async fn extract_comments(
        &self,
        video_url: &str,
        max_count: i64,
        order: CommentOrder,
    ) -> CommentHarvest {
        let Some(video_id) = extract_video_id(video_url) else {
            return CommentHarvest::default();
        };
        if max_count <= 0 {
            return CommentHarvest::default();
        }
        let budget = max_count as usize;

        info!("Extracting comments for video {} (limit: {})", video_id, budget);

        let mut harvest = CommentHarvest::default();
        let mut page_token: Option<String> = None;
        let mut first_page = true;

        loop {
            let remaining = budget - harvest.comments.len();
            if remaining == 0 {
                break;
            }
            let page_size = (UPSTREAM_PAGE_CAP as usize).min(remaining) as u32;

            if !first_page {
                tokio::time::sleep(self.page_delay).await;
            }
            first_page = false;

            let page = match self
                .api
                .comment_threads(&video_id, page_size, order, page_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Comment pagination for {} aborted after {} comments: {}",
                        video_id,
                        harvest.comments.len(),
                        e
                    );
                    harvest.error = Some(e);
                    break;
                }
            };

            let (kept, skipped) = decode_comment_items(&page.items, &video_id);
            if !skipped.is_empty() {
                warn!("Skipped {} malformed comment items for {}", skipped.len(), video_id);
            }
            harvest.comments.extend(kept);
            harvest.skipped.extend(skipped);

            debug!("Collected {} comments so far for {}", harvest.comments.len(), video_id);

            if harvest.comments.len() >= budget {
                break;
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        // Guarantee the budget even if a page overshot it
        harvest.comments.truncate(budget);

        info!(
            "Finished comment harvest for {}: {} collected, {} skipped{}",
            video_id,
            harvest.comments.len(),
            harvest.skipped.len(),
            if harvest.is_partial() { " (partial)" } else { "" }
        );

        harvest
    }

    /// Search for videos by keyword, returning the raw upstream result set.
    pub async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
        options: &SearchOptions,
    ) -> Result<Value> {
        debug!("Searching videos: {:?} (max {})", query, max_results);
        self.api.search(query, max_results, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamCause;
    use crate::youtube::api::{CommentThreadsResponse, VideoListResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn thread_item(id: &str, text: &str, likes: u64, replies: u64) -> Value {
        json!({
            "snippet": {
                "topLevelComment": {
                    "id": id,
                    "snippet": { "textDisplay": text, "likeCount": likes }
                },
                "totalReplyCount": replies
            }
        })
    }

    fn page(count: usize, offset: usize, next_token: Option<&str>) -> CommentThreadsResponse {
        CommentThreadsResponse {
            items: (0..count)
                .map(|i| thread_item(&format!("c{}", offset + i), "text", 0, 0))
                .collect(),
            next_page_token: next_token.map(|t| t.to_string()),
        }
    }

    /// Scripted API fake: pops one pre-canned comment page per request and
    /// records the page sizes it was asked for.
    struct ScriptedApi {
        video: Option<Value>,
        pages: Mutex<VecDeque<Result<CommentThreadsResponse>>>,
        requested_sizes: Mutex<Vec<u32>>,
        requested_orders: Mutex<Vec<CommentOrder>>,
    }

    impl ScriptedApi {
        fn with_pages(pages: Vec<Result<CommentThreadsResponse>>) -> Self {
            Self {
                video: None,
                pages: Mutex::new(pages.into()),
                requested_sizes: Mutex::new(Vec::new()),
                requested_orders: Mutex::new(Vec::new()),
            }
        }

        fn with_video(video: Value) -> Self {
            Self {
                video: Some(video),
                pages: Mutex::new(VecDeque::new()),
                requested_sizes: Mutex::new(Vec::new()),
                requested_orders: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requested_sizes.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VideoApi for ScriptedApi {
        async fn video_details(&self, _video_id: &str) -> Result<VideoListResponse> {
            let items = match &self.video {
                Some(video) => vec![serde_json::from_value(video.clone()).unwrap()],
                None => Vec::new(),
            };
            Ok(VideoListResponse { items })
        }

        async fn comment_threads(
            &self,
            _video_id: &str,
            page_size: u32,
            order: CommentOrder,
            _page_token: Option<&str>,
        ) -> Result<CommentThreadsResponse> {
            self.requested_sizes.lock().unwrap().push(page_size);
            self.requested_orders.lock().unwrap().push(order);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(CommentThreadsResponse::default()))
        }

        async fn search(
            &self,
            _query: &str,
            _max_results: u32,
            _options: &SearchOptions,
        ) -> Result<Value> {
            Ok(json!({"items": []}))
        }
    }

    fn harvester(api: ScriptedApi) -> (Harvester, Arc<ScriptedApi>) {
        let api = Arc::new(api);
        let h = Harvester::new(api.clone()).with_page_delay(Duration::ZERO);
        (h, api)
    }

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    #[tokio::test]
    async fn test_non_positive_budget_issues_no_request() {
        let (h, api) = harvester(ScriptedApi::with_pages(vec![Ok(page(5, 0, None))]));

        let zero = h.extract_comments(URL, 0, CommentOrder::Time).await;
        let negative = h.extract_comments(URL, -3, CommentOrder::Time).await;

        assert!(zero.comments.is_empty());
        assert!(negative.comments.is_empty());
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_url_yields_empty_harvest() {
        let (h, api) = harvester(ScriptedApi::with_pages(vec![Ok(page(5, 0, None))]));

        let harvest = h
            .extract_comments("https://vimeo.com/12345", 10, CommentOrder::Time)
            .await;

        assert!(harvest.comments.is_empty());
        assert!(harvest.error.is_none());
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_page_sizes_respect_cap_and_remaining_budget() {
        let (h, api) = harvester(ScriptedApi::with_pages(vec![
            Ok(page(100, 0, Some("t1"))),
            Ok(page(50, 100, Some("t2"))),
        ]));

        let harvest = h.extract_comments(URL, 150, CommentOrder::Time).await;

        assert_eq!(harvest.comments.len(), 150);
        assert_eq!(*api.requested_sizes.lock().unwrap(), vec![100, 50]);
    }

    #[tokio::test]
    async fn test_stops_when_no_next_page_token() {
        let (h, api) = harvester(ScriptedApi::with_pages(vec![Ok(page(3, 0, None))]));

        let harvest = h.extract_comments(URL, 10, CommentOrder::Time).await;

        assert_eq!(harvest.comments.len(), 3);
        assert_eq!(api.request_count(), 1);
        assert!(harvest.error.is_none());
    }

    #[tokio::test]
    async fn test_result_is_prefix_in_upstream_order() {
        let (h, _) = harvester(ScriptedApi::with_pages(vec![
            Ok(page(4, 0, Some("t1"))),
            Ok(page(4, 4, None)),
        ]));

        let harvest = h.extract_comments(URL, 6, CommentOrder::Relevance).await;

        let ids: Vec<&str> = harvest.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "c1", "c2", "c3", "c4", "c5"]);
    }

    #[tokio::test]
    async fn test_malformed_item_skipped_not_fatal() {
        let mut bad_page = page(2, 0, None);
        bad_page.items.insert(1, json!({"snippet": {"totalReplyCount": "not a number"}}));
        let (h, _) = harvester(ScriptedApi::with_pages(vec![Ok(bad_page)]));

        let harvest = h.extract_comments(URL, 10, CommentOrder::Time).await;

        assert_eq!(harvest.comments.len(), 2);
        assert_eq!(harvest.skipped.len(), 1);
        assert!(harvest.error.is_none());
    }

    #[tokio::test]
    async fn test_upstream_failure_preserves_partial_results() {
        let (h, _) = harvester(ScriptedApi::with_pages(vec![
            Ok(page(100, 0, Some("t1"))),
            Err(VidharvestError::Upstream {
                status: 403,
                cause: UpstreamCause::QuotaExceeded,
            }),
        ]));

        let harvest = h.extract_comments(URL, 250, CommentOrder::Time).await;

        assert_eq!(harvest.comments.len(), 100);
        assert!(harvest.is_partial());
        match harvest.error {
            Some(VidharvestError::Upstream { status: 403, cause }) => {
                assert_eq!(cause, UpstreamCause::QuotaExceeded);
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_order_hint_passed_through() {
        let (h, api) = harvester(ScriptedApi::with_pages(vec![Ok(page(1, 0, None))]));

        h.extract_comments(URL, 5, CommentOrder::Relevance).await;

        assert_eq!(*api.requested_orders.lock().unwrap(), vec![CommentOrder::Relevance]);
    }

    #[tokio::test]
    async fn test_get_video_info_not_found() {
        let (h, _) = harvester(ScriptedApi::with_pages(vec![]));

        match h.get_video_info(URL).await {
            Err(VidharvestError::VideoNotFound(id)) => assert_eq!(id, "dQw4w9WgXcQ"),
            other => panic!("expected VideoNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_video_info_invalid_reference() {
        let (h, _) = harvester(ScriptedApi::with_pages(vec![]));

        assert!(matches!(
            h.get_video_info("nope").await,
            Err(VidharvestError::InvalidReference(_))
        ));
    }

    #[tokio::test]
    async fn test_get_video_info_tolerates_missing_counts() {
        let (h, _) = harvester(ScriptedApi::with_video(json!({
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "title": "Never Gonna Give You Up",
                "description": "Official video",
                "channelTitle": "Rick Astley",
                "publishedAt": "2009-10-25T06:57:33Z"
            },
            "statistics": { "viewCount": "1000000" },
            "contentDetails": { "duration": "PT3M33S" }
        })));

        let video = h.get_video_info(URL).await.unwrap();

        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(video.view_count, 1_000_000);
        assert_eq!(video.like_count, 0);
        assert_eq!(video.comment_count, 0);
        assert_eq!(video.duration, "PT3M33S");
        assert!(video.published_at.is_some());
    }
}
