//! CLI module for vidharvest.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// vidharvest - YouTube metadata and comment harvester
///
/// Harvests video metadata and top-level comments from the YouTube Data API
/// into a local SQLite database, and exposes the same operations as MCP tools.
#[derive(Parser, Debug)]
#[command(name = "vidharvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show metadata for a video without storing anything
    Info {
        /// YouTube video URL
        url: String,
    },

    /// Harvest a video's metadata and comments into the database
    Load {
        /// YouTube video URL
        url: String,

        /// Maximum number of comments to harvest
        #[arg(short, long, default_value = "5")]
        max_comments: i64,

        /// Comment ordering (time or relevance)
        #[arg(short, long, default_value = "time")]
        order: String,
    },

    /// Search YouTube for videos
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u32,

        /// Result ordering (date, rating, relevance, title, viewCount)
        #[arg(long)]
        order: Option<String>,

        /// Duration filter (short, medium, long)
        #[arg(long)]
        duration: Option<String>,

        /// Only videos published after this RFC 3339 timestamp
        #[arg(long)]
        published_after: Option<String>,

        /// Only videos published before this RFC 3339 timestamp
        #[arg(long)]
        published_before: Option<String>,

        /// Caption filter (closedCaption, none)
        #[arg(long)]
        caption: Option<String>,

        /// Definition filter (high, standard)
        #[arg(long)]
        definition: Option<String>,

        /// ISO 3166-1 alpha-2 region code
        #[arg(long)]
        region: Option<String>,

        /// Restrict results to a channel ID
        #[arg(long)]
        channel: Option<String>,
    },

    /// List harvested videos in the database
    List,

    /// Start an interactive chat session with the YouTube tools declared
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start MCP server for AI assistant integration
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init,

    /// Show configuration file path
    Path,
}
