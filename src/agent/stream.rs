//! Response stream multiplexing.
//!
//! Turns an agent's heterogeneous event stream (text fragments interleaved
//! with tool-invocation fragments) into a single ordered text stream with
//! explicit separators at mode transitions.

use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;

/// Content of a message fragment.
#[derive(Debug, Clone)]
pub enum MessageContent {
    /// Plain text.
    Text(String),
    /// Structured content, coerced to text on projection.
    Structured(Value),
}

impl MessageContent {
    fn to_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Structured(value) => value.to_string(),
        }
    }
}

/// A partial tool invocation: name and/or a slice of argument text.
#[derive(Debug, Clone, Default)]
pub struct ToolCallChunk {
    pub name: Option<String>,
    pub args: Option<String>,
}

/// One event from the agent's streaming call.
#[derive(Debug, Clone, Default)]
pub struct StreamEvent {
    /// Plain content fragment, if any.
    pub content: Option<MessageContent>,
    /// Tool-invocation fragments. Only the first is inspected; if several
    /// concurrent calls are in flight, only one argument stream surfaces.
    pub tool_call_chunks: Vec<ToolCallChunk>,
    /// Finish reason, when the upstream annotated one on this event.
    pub finish_reason: Option<String>,
}

/// Metadata paired with each event. The multiplexer never inspects it.
#[derive(Debug, Clone, Default)]
pub struct EventMetadata {
    /// Graph node the event originated from, when known.
    pub node: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Content,
    ToolCall,
}

/// State machine projecting agent events into ordered text fragments.
///
/// Purely a projection: events are read, never stored or mutated.
pub struct ResponseMultiplexer {
    state: StreamState,
}

impl ResponseMultiplexer {
    pub fn new() -> Self {
        Self {
            state: StreamState::Content,
        }
    }

    /// Project one event into zero or more text fragments, in emit order.
    ///
    /// A tool chunk with a non-empty name becomes a bracketed announcement
    /// marker in place of its argument text; a chunk with only arguments is
    /// emitted verbatim. An event whose finish reason signals tool calls
    /// while content was streaming at arrival adds a blank-line separator:
    /// after the event's own content, or before its tool fragment.
    pub fn project(&mut self, event: &StreamEvent) -> Vec<String> {
        let separate = event.finish_reason.as_deref() == Some("tool_calls")
            && self.state == StreamState::Content;
        let mut out = Vec::new();

        if let Some(chunk) = event.tool_call_chunks.first() {
            if separate {
                out.push("\n\n".to_string());
            }
            match chunk.name.as_deref() {
                Some(name) if !name.is_empty() => {
                    out.push(format!("\n\n< TOOL CALL: {} >\n\n", name));
                }
                _ => {
                    if let Some(args) = &chunk.args {
                        if !args.is_empty() {
                            out.push(args.clone());
                        }
                    }
                }
            }
            self.state = StreamState::ToolCall;
        } else {
            if let Some(content) = &event.content {
                let text = content.to_text();
                if !text.is_empty() {
                    out.push(text);
                }
                self.state = StreamState::Content;
            }
            if separate {
                out.push("\n\n".to_string());
                self.state = StreamState::ToolCall;
            }
        }

        out
    }
}

impl Default for ResponseMultiplexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapt an agent event stream into the ordered text stream a caller renders.
pub fn stream_agent_responses<S>(events: S) -> impl Stream<Item = String>
where
    S: Stream<Item = (StreamEvent, EventMetadata)>,
{
    let mut mux = ResponseMultiplexer::new();
    events.flat_map(move |(event, _metadata)| stream::iter(mux.project(&event)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn content(text: &str) -> StreamEvent {
        StreamEvent {
            content: Some(MessageContent::Text(text.to_string())),
            ..Default::default()
        }
    }

    fn tool_name(name: &str) -> StreamEvent {
        StreamEvent {
            tool_call_chunks: vec![ToolCallChunk {
                name: Some(name.to_string()),
                args: None,
            }],
            ..Default::default()
        }
    }

    fn tool_args(args: &str) -> StreamEvent {
        StreamEvent {
            tool_call_chunks: vec![ToolCallChunk {
                name: None,
                args: Some(args.to_string()),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_required_projection_scenario() {
        let mut finishing = content(" there");
        finishing.finish_reason = Some("tool_calls".to_string());

        let events = vec![
            content("Hi"),
            finishing,
            tool_name("search"),
            tool_args("{q:1}"),
            content("done"),
        ];

        let projected: Vec<String> = stream_agent_responses(stream::iter(
            events.into_iter().map(|e| (e, EventMetadata::default())),
        ))
        .collect()
        .await;

        assert_eq!(
            projected,
            vec![
                "Hi",
                " there",
                "\n\n",
                "\n\n< TOOL CALL: search >\n\n",
                "{q:1}",
                "done",
            ]
        );
    }

    #[test]
    fn test_name_marker_replaces_argument_text() {
        let mut mux = ResponseMultiplexer::new();
        let event = StreamEvent {
            tool_call_chunks: vec![ToolCallChunk {
                name: Some("search".to_string()),
                args: Some(r#"{"q":"hello"}"#.to_string()),
            }],
            ..Default::default()
        };

        assert_eq!(mux.project(&event), vec!["\n\n< TOOL CALL: search >\n\n"]);
    }

    #[test]
    fn test_only_first_tool_chunk_inspected() {
        let mut mux = ResponseMultiplexer::new();
        let event = StreamEvent {
            tool_call_chunks: vec![
                ToolCallChunk {
                    name: None,
                    args: Some("first".to_string()),
                },
                ToolCallChunk {
                    name: Some("second_tool".to_string()),
                    args: None,
                },
            ],
            ..Default::default()
        };

        assert_eq!(mux.project(&event), vec!["first"]);
    }

    #[test]
    fn test_structured_content_coerced_to_text() {
        let mut mux = ResponseMultiplexer::new();
        let event = StreamEvent {
            content: Some(MessageContent::Structured(serde_json::json!({"k": 1}))),
            ..Default::default()
        };

        assert_eq!(mux.project(&event), vec![r#"{"k":1}"#]);
    }

    #[test]
    fn test_separator_precedes_tool_fragment_on_same_event() {
        let mut mux = ResponseMultiplexer::new();
        mux.project(&content("intro"));

        // Content was streaming when this event arrived, so the separator
        // lands before the tool announcement it carries
        let mut event = tool_name("search");
        event.finish_reason = Some("tool_calls".to_string());

        assert_eq!(
            mux.project(&event),
            vec!["\n\n", "\n\n< TOOL CALL: search >\n\n"]
        );
    }

    #[test]
    fn test_no_separator_while_already_in_tool_call() {
        let mut mux = ResponseMultiplexer::new();
        mux.project(&tool_name("search"));

        // A finish reason arriving mid tool call must not double-separate
        let mut event = tool_args("{}");
        event.finish_reason = Some("tool_calls".to_string());

        assert_eq!(mux.project(&event), vec!["{}"]);
    }

    #[test]
    fn test_separator_emitted_again_after_returning_to_content() {
        let mut mux = ResponseMultiplexer::new();

        let mut first = content("a");
        first.finish_reason = Some("tool_calls".to_string());
        assert_eq!(mux.project(&first), vec!["a", "\n\n"]);

        mux.project(&tool_name("t"));
        mux.project(&content("back"));

        let mut second = content("b");
        second.finish_reason = Some("tool_calls".to_string());
        assert_eq!(mux.project(&second), vec!["b", "\n\n"]);
    }

    #[test]
    fn test_empty_fragments_emit_nothing() {
        let mut mux = ResponseMultiplexer::new();
        assert!(mux.project(&content("")).is_empty());
        assert!(mux.project(&tool_args("")).is_empty());
        assert!(mux.project(&StreamEvent::default()).is_empty());
    }
}
