//! MCP (Model Context Protocol) server for vidharvest.
//!
//! Exposes the YouTube search and load-and-persist tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
