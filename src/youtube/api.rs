//! YouTube Data API v3 client.
//!
//! A thin typed wrapper over the three list endpoints the harvester needs
//! (`videos`, `commentThreads`, `search`). The `VideoApi` trait is the seam
//! that lets the harvester run against a scripted fake in tests.

use crate::error::{Result, UpstreamCause, VidharvestError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default timeout for upstream API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Comment ordering hint, passed through to the upstream opaquely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentOrder {
    /// Most recent first.
    #[default]
    Time,
    /// Upstream relevance ranking.
    Relevance,
}

impl CommentOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentOrder::Time => "time",
            CommentOrder::Relevance => "relevance",
        }
    }
}

impl std::str::FromStr for CommentOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(CommentOrder::Time),
            "relevance" => Ok(CommentOrder::Relevance),
            _ => Err(format!("Unknown comment order: {} (expected 'time' or 'relevance')", s)),
        }
    }
}

impl std::fmt::Display for CommentOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recognized optional search parameters, each omitted from the request
/// when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Result ordering (`date`, `rating`, `relevance`, `title`, `viewCount`).
    pub order: Option<String>,
    /// Duration filter (`short`, `medium`, `long`).
    pub video_duration: Option<String>,
    /// RFC 3339 lower bound on publication date.
    pub published_after: Option<String>,
    /// RFC 3339 upper bound on publication date.
    pub published_before: Option<String>,
    /// Caption filter (`closedCaption`, `none`).
    pub video_caption: Option<String>,
    /// Definition filter (`high`, `standard`).
    pub video_definition: Option<String>,
    /// ISO 3166-1 alpha-2 region code.
    pub region_code: Option<String>,
    /// Restrict results to a channel.
    pub channel_id: Option<String>,
}

impl SearchOptions {
    /// Append the set fields as query parameters using the upstream's names.
    fn append_to(&self, params: &mut Vec<(&'static str, String)>) {
        let fields: [(&'static str, &Option<String>); 8] = [
            ("order", &self.order),
            ("videoDuration", &self.video_duration),
            ("publishedAfter", &self.published_after),
            ("publishedBefore", &self.published_before),
            ("videoCaption", &self.video_caption),
            ("videoDefinition", &self.video_definition),
            ("regionCode", &self.region_code),
            ("channelId", &self.channel_id),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                if !v.is_empty() {
                    params.push((name, v.clone()));
                }
            }
        }
    }
}

/// `videos.list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
    #[serde(default, rename = "contentDetails")]
    pub content_details: VideoContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
}

/// Statistics arrive as decimal strings; absent fields decode to `None`
/// and are treated as zero downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoContentDetails {
    pub duration: String,
}

/// `commentThreads.list` response.
///
/// Items are kept as raw JSON so a malformed item can be skipped without
/// aborting the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThreadsResponse {
    pub items: Vec<Value>,
    pub next_page_token: Option<String>,
}

/// One decoded comment thread item (top-level comment only).
#[derive(Debug, Clone, Deserialize)]
pub struct CommentThreadItem {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
    #[serde(default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopLevelComment {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub text_display: String,
    #[serde(default)]
    pub like_count: u64,
}

/// Seam over the upstream list endpoints.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Single-item lookup returning snippet, statistics and content details.
    async fn video_details(&self, video_id: &str) -> Result<VideoListResponse>;

    /// One page of top-level comment threads.
    async fn comment_threads(
        &self,
        video_id: &str,
        page_size: u32,
        order: CommentOrder,
        page_token: Option<&str>,
    ) -> Result<CommentThreadsResponse>;

    /// Keyword search, returned as the raw upstream result set.
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        options: &SearchOptions,
    ) -> Result<Value>;
}

/// Classify an upstream rejection from its status code and body markers.
///
/// The upstream reports quota exhaustion and disabled comments both as 403,
/// distinguishable only by the body.
pub fn classify_upstream(status: u16, body: &str) -> UpstreamCause {
    match status {
        403 if body.contains("quotaExceeded") => UpstreamCause::QuotaExceeded,
        403 if body.contains("commentsDisabled") => UpstreamCause::CommentsDisabled,
        403 => UpstreamCause::Forbidden,
        404 => UpstreamCause::NotFound,
        _ => UpstreamCause::Other,
    }
}

/// Client for the YouTube Data API v3.
///
/// Constructed once at startup; a missing API key is a constructor-time
/// error rather than a runtime sentinel.
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Create a client with the given API key.
    pub fn new(api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(VidharvestError::Config(
                "YouTube API key is empty; set YOUTUBE_DATA_API_KEY in your environment or .env file"
                    .to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| VidharvestError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.trim().to_string(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Create a client from the `YOUTUBE_DATA_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("YOUTUBE_DATA_API_KEY").map_err(|_| {
            VidharvestError::Config(
                "YOUTUBE_DATA_API_KEY environment variable not found; set it in your .env file or environment"
                    .to_string(),
            )
        })?;
        Self::new(&key)
    }

    /// Point the client at a different base URL (for local API mocks).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} ({} params)", url, params.len());

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let cause = classify_upstream(status.as_u16(), &body);
            return Err(VidharvestError::Upstream {
                status: status.as_u16(),
                cause,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    async fn video_details(&self, video_id: &str) -> Result<VideoListResponse> {
        let params = vec![
            ("part", "snippet,statistics,contentDetails".to_string()),
            ("id", video_id.to_string()),
        ];
        self.get("videos", &params).await
    }

    async fn comment_threads(
        &self,
        video_id: &str,
        page_size: u32,
        order: CommentOrder,
        page_token: Option<&str>,
    ) -> Result<CommentThreadsResponse> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", page_size.to_string()),
            ("order", order.as_str().to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }
        self.get("commentThreads", &params).await
    }

    async fn search(
        &self,
        query: &str,
        max_results: u32,
        options: &SearchOptions,
    ) -> Result<Value> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("maxResults", max_results.to_string()),
            ("type", "video".to_string()),
        ];
        options.append_to(&mut params);
        self.get("search", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_403_body_markers() {
        assert_eq!(
            classify_upstream(403, r#"{"error": {"errors": [{"reason": "quotaExceeded"}]}}"#),
            UpstreamCause::QuotaExceeded
        );
        assert_eq!(
            classify_upstream(403, r#"{"error": {"errors": [{"reason": "commentsDisabled"}]}}"#),
            UpstreamCause::CommentsDisabled
        );
        assert_eq!(classify_upstream(403, "no marker here"), UpstreamCause::Forbidden);
    }

    #[test]
    fn test_classify_other_statuses() {
        assert_eq!(classify_upstream(404, ""), UpstreamCause::NotFound);
        assert_eq!(classify_upstream(500, ""), UpstreamCause::Other);
        assert_eq!(classify_upstream(429, ""), UpstreamCause::Other);
    }

    #[test]
    fn test_empty_api_key_rejected_at_construction() {
        assert!(YouTubeClient::new("").is_err());
        assert!(YouTubeClient::new("   ").is_err());
        assert!(YouTubeClient::new("AIza-test-key").is_ok());
    }

    #[test]
    fn test_search_options_only_set_fields_appended() {
        let options = SearchOptions {
            order: Some("date".to_string()),
            region_code: Some("NO".to_string()),
            ..Default::default()
        };
        let mut params = Vec::new();
        options.append_to(&mut params);
        assert_eq!(
            params,
            vec![
                ("order", "date".to_string()),
                ("regionCode", "NO".to_string())
            ]
        );
    }

    #[test]
    fn test_comment_order_parse() {
        assert_eq!("time".parse::<CommentOrder>().unwrap(), CommentOrder::Time);
        assert_eq!(
            "Relevance".parse::<CommentOrder>().unwrap(),
            CommentOrder::Relevance
        );
        assert!("views".parse::<CommentOrder>().is_err());
    }
}
