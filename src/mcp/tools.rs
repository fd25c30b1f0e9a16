//! MCP tool definitions for vidharvest.

use super::protocol::Tool;
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "youtube_search_videos".to_string(),
            description: "Search YouTube for videos based on a query and optional filters. \
                Returns a JSON string containing the search results."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 10
                    },
                    "order": {
                        "type": "string",
                        "description": "Result ordering: date, rating, relevance, title, viewCount"
                    },
                    "video_duration": {
                        "type": "string",
                        "description": "Duration filter: short, medium, long"
                    },
                    "published_after": {
                        "type": "string",
                        "description": "RFC 3339 lower bound on publication date"
                    },
                    "published_before": {
                        "type": "string",
                        "description": "RFC 3339 upper bound on publication date"
                    },
                    "video_caption": {
                        "type": "string",
                        "description": "Caption filter: closedCaption, none"
                    },
                    "video_definition": {
                        "type": "string",
                        "description": "Definition filter: high, standard"
                    },
                    "region_code": {
                        "type": "string",
                        "description": "ISO 3166-1 alpha-2 region code"
                    },
                    "channel_id": {
                        "type": "string",
                        "description": "Restrict results to a channel"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "youtube_load_video_data_and_comments".to_string(),
            description: "Download video metadata and top-level comments for a YouTube video \
                and store them in the database. Returns a status message."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "video_url": {
                        "type": "string",
                        "description": "YouTube video URL"
                    },
                    "max_comments": {
                        "type": "integer",
                        "description": "Maximum number of comments to retrieve (default: 5). \
                            Limited to 50 to prevent memory issues.",
                        "default": 5
                    },
                    "order": {
                        "type": "string",
                        "description": "Comment ordering: time or relevance",
                        "default": "time"
                    }
                },
                "required": ["video_url"]
            }),
        },
    ]
}
