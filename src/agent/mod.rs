//! Agent streaming surface.
//!
//! The agent engine itself is an external collaborator exposing a single
//! event-streaming call; this module defines that boundary (`AgentGraph`),
//! an OpenAI-backed implementation, and the multiplexer that projects the
//! event stream into ordered text.

mod openai;
mod stream;
mod tools;

pub use openai::{
    AgentEventStream, AgentGraph, AgentInput, AgentMessage, AgentRole, OpenAiAgent, RunConfig,
};
pub use stream::{
    stream_agent_responses, EventMetadata, MessageContent, ResponseMultiplexer, StreamEvent,
    ToolCallChunk,
};
pub use tools::tool_definitions;
