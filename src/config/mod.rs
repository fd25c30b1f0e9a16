//! Configuration module for vidharvest.
//!
//! Handles application settings and the MCP server launch configuration.

mod servers;
mod settings;

pub use servers::{load_servers_config, resolve_env_refs, ServerEntry, ServersConfig, SkippedServer};
pub use settings::{AgentSettings, GeneralSettings, Settings, StorageSettings, YoutubeSettings};
