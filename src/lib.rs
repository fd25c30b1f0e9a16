//! vidharvest - YouTube metadata and comment harvesting
//!
//! A CLI tool and MCP server that harvests video metadata and top-level
//! comments from the YouTube Data API and persists them to a local SQLite
//! database, plus a chat frontend that multiplexes an agent's streamed
//! output into a single ordered text stream.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Application settings and MCP server launch configuration
//! - `youtube` - URL resolution, the upstream API client, and the
//!   paginated harvester
//! - `store` - Trait-seamed video/comment storage (SQLite and in-memory)
//! - `persist` - Batched persistence of harvested collections
//! - `agent` - Agent streaming boundary and the response multiplexer
//! - `mcp` - JSON-RPC 2.0 stdio server exposing the harvesting tools
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidharvest::persist::BatchedPersister;
//! use vidharvest::store::SqliteVideoStore;
//! use vidharvest::youtube::{CommentOrder, Harvester, YouTubeClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(YouTubeClient::from_env()?);
//!     let harvester = Harvester::new(client);
//!
//!     let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//!     let video = harvester.get_video_info(url).await?;
//!     let harvest = harvester.extract_comments(url, 50, CommentOrder::Time).await;
//!
//!     let store = Arc::new(SqliteVideoStore::new("videos.db".as_ref())?);
//!     let persister = BatchedPersister::new(store);
//!     let processed = persister.persist(&video, &harvest.comments).await?;
//!     println!("Persisted {} comments", processed);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod persist;
pub mod store;
pub mod youtube;

pub use error::{Result, VidharvestError};
