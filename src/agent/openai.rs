//! OpenAI-backed agent stream producer.
//!
//! The agent orchestration engine proper is an external collaborator; this
//! is the minimal concrete `AgentGraph` the chat frontend needs, streaming
//! one model turn with the YouTube tools declared.

use super::stream::{EventMetadata, MessageContent, StreamEvent, ToolCallChunk};
use super::tools::tool_definitions;
use crate::error::{Result, VidharvestError};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, FinishReason,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;
use tracing::warn;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful assistant for exploring YouTube content.

You have tools to search for videos and to load a video's metadata and comments into the local database.

Guidelines:
- Use 'youtube_search_videos' to find videos matching a query
- Use 'youtube_load_video_data_and_comments' to harvest a specific video URL into storage
- Summarize tool results for the user instead of repeating raw JSON"#;

/// Ordered stream of `(event, metadata)` pairs from an agent invocation.
/// Naturally finite; a fresh call must be issued for a new turn.
pub type AgentEventStream = Pin<Box<dyn Stream<Item = (StreamEvent, EventMetadata)> + Send>>;

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    User,
    Assistant,
}

/// One message in the agent's input.
#[derive(Debug, Clone)]
pub struct AgentMessage {
    pub role: AgentRole,
    pub content: String,
}

impl AgentMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: AgentRole::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: AgentRole::Assistant,
            content: content.to_string(),
        }
    }
}

/// Input to one agent invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentInput {
    pub messages: Vec<AgentMessage>,
}

/// Per-invocation configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Conversation thread identifier.
    pub thread_id: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thread_id: "1".to_string(),
        }
    }
}

/// Black-box boundary to the agent engine: a single event-streaming call.
#[async_trait]
pub trait AgentGraph: Send + Sync {
    /// Stream one agent turn as `(event, metadata)` pairs.
    async fn astream(&self, input: AgentInput, config: &RunConfig) -> Result<AgentEventStream>;
}

/// Create an OpenAI client with a configured request timeout.
fn create_client() -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| VidharvestError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

fn finish_reason_label(reason: FinishReason) -> String {
    match reason {
        FinishReason::Stop => "stop",
        FinishReason::Length => "length",
        FinishReason::ToolCalls => "tool_calls",
        FinishReason::ContentFilter => "content_filter",
        FinishReason::FunctionCall => "function_call",
    }
    .to_string()
}

/// Agent streaming chat completions from OpenAI with the YouTube tools
/// declared.
pub struct OpenAiAgent {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: String,
}

impl OpenAiAgent {
    /// Create an agent for the given model.
    pub fn new(model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        })
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    fn build_messages(&self, input: &AgentInput) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| VidharvestError::Agent(e.to_string()))?
                .into(),
        ];

        for message in &input.messages {
            let request_message: ChatCompletionRequestMessage = match message.role {
                AgentRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| VidharvestError::Agent(e.to_string()))?
                    .into(),
                AgentRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| VidharvestError::Agent(e.to_string()))?
                    .into(),
            };
            messages.push(request_message);
        }

        Ok(messages)
    }
}

#[async_trait]
impl AgentGraph for OpenAiAgent {
    async fn astream(&self, input: AgentInput, config: &RunConfig) -> Result<AgentEventStream> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.build_messages(&input)?)
            .tools(tool_definitions())
            .user(config.thread_id.clone())
            .stream(true)
            .build()
            .map_err(|e| VidharvestError::Agent(e.to_string()))?;

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| VidharvestError::OpenAI(format!("Agent stream error: {}", e)))?;

        let events = stream.filter_map(|item| async move {
            let response = match item {
                Ok(response) => response,
                Err(e) => {
                    warn!("Dropping malformed stream chunk: {}", e);
                    return None;
                }
            };

            let choice = response.choices.into_iter().next()?;
            let mut event = StreamEvent::default();

            if let Some(text) = choice.delta.content {
                event.content = Some(MessageContent::Text(text));
            }
            if let Some(tool_calls) = choice.delta.tool_calls {
                event.tool_call_chunks = tool_calls
                    .into_iter()
                    .map(|tc| ToolCallChunk {
                        name: tc.function.as_ref().and_then(|f| f.name.clone()),
                        args: tc.function.as_ref().and_then(|f| f.arguments.clone()),
                    })
                    .collect();
            }
            event.finish_reason = choice.finish_reason.map(finish_reason_label);

            Some((event, EventMetadata::default()))
        });

        Ok(Box::pin(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_labels() {
        assert_eq!(finish_reason_label(FinishReason::ToolCalls), "tool_calls");
        assert_eq!(finish_reason_label(FinishReason::Stop), "stop");
    }

    #[test]
    fn test_build_messages_prepends_system_prompt() {
        let agent = OpenAiAgent::new("gpt-4.1-mini").unwrap();
        let input = AgentInput {
            messages: vec![AgentMessage::user("hello"), AgentMessage::assistant("hi")],
        };

        let messages = agent.build_messages(&input).unwrap();
        assert_eq!(messages.len(), 3);
    }
}
