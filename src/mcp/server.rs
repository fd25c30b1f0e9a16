//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::config::Settings;
use crate::persist::BatchedPersister;
use crate::store::SqliteVideoStore;
use crate::youtube::{CommentOrder, Harvester, SearchOptions, YouTubeClient};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "vidharvest";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server exposing the YouTube harvesting tools.
///
/// The API client and store are constructed up front; a missing API key
/// fails here rather than surfacing as a sentinel during a tool call.
pub struct McpServer {
    harvester: Harvester,
    persister: BatchedPersister,
    comment_cap: i64,
}

impl McpServer {
    /// Build the server from settings.
    pub fn new(settings: &Settings) -> crate::error::Result<Self> {
        let client = Arc::new(YouTubeClient::from_env()?);
        let harvester = Harvester::new(client)
            .with_page_delay(Duration::from_millis(settings.youtube.page_delay_ms));

        let store = Arc::new(SqliteVideoStore::new(&settings.db_path())?);
        let persister = BatchedPersister::new(store);

        Ok(Self::from_parts(
            harvester,
            persister,
            settings.youtube.comment_cap,
        ))
    }

    fn from_parts(harvester: Harvester, persister: BatchedPersister, comment_cap: i64) -> Self {
        Self {
            harvester,
            persister,
            comment_cap,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // Log to stderr so it doesn't interfere with JSON-RPC
        eprintln!("vidharvest MCP server starting...");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, -32700, "Parse error");
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                    stdout.flush()?;
                    continue;
                }
            };

            let response = self.handle_request(request).await;
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        let result = match params.name.as_str() {
            "youtube_search_videos" => self.tool_search_videos(params.arguments).await,
            "youtube_load_video_data_and_comments" => {
                self.tool_load_video_data(params.arguments).await
            }
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Search tool.
    async fn tool_search_videos(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let query = match args.get("query").and_then(|v| v.as_str()) {
            Some(q) => q.to_string(),
            None => return ToolCallResult::error("Missing 'query' argument".to_string()),
        };

        let max_results = args
            .get("max_results")
            .and_then(|v| v.as_u64())
            .unwrap_or(10) as u32;

        // The recognized optional filters share field names with the args
        // object; everything else is ignored.
        let options: SearchOptions = serde_json::from_value(args).unwrap_or_default();

        match self.harvester.search_videos(&query, max_results, &options).await {
            Ok(results) => match serde_json::to_string(&results) {
                Ok(serialized) => ToolCallResult::text(serialized),
                Err(e) => ToolCallResult::error(format!("Failed to serialize results: {}", e)),
            },
            Err(e) => ToolCallResult::error(format!("Failed to search videos: {}", e)),
        }
    }

    /// Load-and-persist tool.
    async fn tool_load_video_data(&self, args: Option<Value>) -> ToolCallResult {
        let args = match args {
            Some(a) => a,
            None => return ToolCallResult::error("Missing arguments".to_string()),
        };

        let video_url = match args.get("video_url").and_then(|v| v.as_str()) {
            Some(u) => u.to_string(),
            None => return ToolCallResult::error("Missing 'video_url' argument".to_string()),
        };

        let mut max_comments = args
            .get("max_comments")
            .and_then(|v| v.as_i64())
            .unwrap_or(5);

        if max_comments > self.comment_cap {
            warn!(
                "Limiting max_comments from {} to {} to prevent memory issues",
                max_comments, self.comment_cap
            );
            max_comments = self.comment_cap;
        }

        let order = args
            .get("order")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<CommentOrder>().ok())
            .unwrap_or_default();

        let video = match self.harvester.get_video_info(&video_url).await {
            Ok(video) => video,
            Err(e) => {
                return ToolCallResult::error(format!(
                    "Failed to get video info for {}: {}",
                    video_url, e
                ))
            }
        };

        let harvest = self
            .harvester
            .extract_comments(&video_url, max_comments, order)
            .await;

        let processed = match self.persister.persist(&video, &harvest.comments).await {
            Ok(processed) => processed,
            Err(e) => {
                return ToolCallResult::error(format!(
                    "Failed to load video and comments for {}: {}",
                    video_url, e
                ))
            }
        };

        let mut status = format!(
            "Successfully loaded video and {} comments for '{}' to the database.",
            processed, video.title
        );
        if !harvest.skipped.is_empty() {
            status.push_str(&format!(
                " Skipped {} malformed comment items.",
                harvest.skipped.len()
            ));
        }
        if let Some(e) = &harvest.error {
            status.push_str(&format!(" Comment harvest stopped early: {}.", e));
        }

        ToolCallResult::text(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::store::MemoryVideoStore;
    use crate::youtube::api::{CommentThreadsResponse, VideoApi, VideoListResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake upstream serving as many comments as each page asks for, so the
    /// total requested across pages equals the harvester's effective budget.
    #[derive(Default)]
    struct RecordingApi {
        requested_sizes: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl VideoApi for RecordingApi {
        async fn video_details(&self, _video_id: &str) -> Result<VideoListResponse> {
            let item = serde_json::from_value(json!({
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "title": "Clamped Video",
                    "description": "",
                    "channelTitle": "Channel",
                    "publishedAt": "2020-01-01T00:00:00Z"
                },
                "statistics": {},
                "contentDetails": { "duration": "PT1M" }
            }))
            .unwrap();
            Ok(VideoListResponse { items: vec![item] })
        }

        async fn comment_threads(
            &self,
            _video_id: &str,
            page_size: u32,
            _order: CommentOrder,
            _page_token: Option<&str>,
        ) -> Result<CommentThreadsResponse> {
            self.requested_sizes.lock().unwrap().push(page_size);
            let items = (0..page_size)
                .map(|i| {
                    json!({
                        "snippet": {
                            "topLevelComment": {
                                "id": format!("c{}", i),
                                "snippet": { "textDisplay": "text", "likeCount": 0 }
                            },
                            "totalReplyCount": 0
                        }
                    })
                })
                .collect();
            Ok(CommentThreadsResponse {
                items,
                next_page_token: Some("next".to_string()),
            })
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

    fn server_with_cap(
        comment_cap: i64,
    ) -> (McpServer, Arc<RecordingApi>, Arc<MemoryVideoStore>) {
        let api = Arc::new(RecordingApi::default());
        let harvester =
            Harvester::new(api.clone() as Arc<dyn VideoApi>).with_page_delay(Duration::ZERO);
        let store = Arc::new(MemoryVideoStore::new());
        let persister = BatchedPersister::new(store.clone());
        (
            McpServer::from_parts(harvester, persister, comment_cap),
            api,
            store,
        )
    }

    #[tokio::test]
    async fn test_load_tool_clamps_comment_budget() {
        let (server, api, store) = server_with_cap(50);

        let result = server
            .tool_load_video_data(Some(json!({
                "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "max_comments": 60
            })))
            .await;

        assert!(result.is_error.is_none());
        // The requested budget exceeds the cap, so the upstream only ever
        // sees the clamped 50
        assert_eq!(*api.requested_sizes.lock().unwrap(), vec![50]);
        assert_eq!(store.stored_comment_count(), 50);
    }

    #[tokio::test]
    async fn test_load_tool_requests_below_cap_pass_through() {
        let (server, api, store) = server_with_cap(50);

        let result = server
            .tool_load_video_data(Some(json!({
                "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                "max_comments": 7
            })))
            .await;

        assert!(result.is_error.is_none());
        assert_eq!(*api.requested_sizes.lock().unwrap(), vec![7]);
        assert_eq!(store.stored_comment_count(), 7);
    }

    #[tokio::test]
    async fn test_load_tool_missing_url_is_error_result() {
        let (server, _, _) = server_with_cap(50);

        let result = server.tool_load_video_data(Some(json!({}))).await;

        assert_eq!(result.is_error, Some(true));
    }
}
