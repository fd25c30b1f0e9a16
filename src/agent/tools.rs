//! Tool declarations for the chat agent.
//!
//! These mirror the MCP tool surface so the agent runtime sees the same
//! callable operations the MCP server exposes.

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

/// OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<ChatCompletionTool> {
    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "youtube_search_videos".to_string(),
                description: Some(
                    "Search YouTube for videos matching a query. \
                    Returns a JSON result set of matching videos."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The search query"
                        },
                        "max_results": {
                            "type": "integer",
                            "description": "Maximum number of results (default: 10)",
                            "default": 10
                        },
                        "order": {
                            "type": "string",
                            "description": "Result ordering: date, rating, relevance, title, viewCount"
                        },
                        "published_after": {
                            "type": "string",
                            "description": "RFC 3339 lower bound on publication date"
                        }
                    },
                    "required": ["query"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "youtube_load_video_data_and_comments".to_string(),
                description: Some(
                    "Download metadata and top-level comments for a YouTube video \
                    and store them in the local database. Returns a status message."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "video_url": {
                            "type": "string",
                            "description": "YouTube video URL"
                        },
                        "max_comments": {
                            "type": "integer",
                            "description": "Maximum comments to retrieve (default: 5, capped at 50)",
                            "default": 5
                        }
                    },
                    "required": ["video_url"]
                })),
                strict: None,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_match_mcp_surface() {
        let names: Vec<String> = tool_definitions()
            .into_iter()
            .map(|t| t.function.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "youtube_search_videos",
                "youtube_load_video_data_and_comments"
            ]
        );
    }
}
