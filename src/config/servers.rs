//! MCP server launch configuration.
//!
//! A JSON document maps server names to launch specs whose values may
//! reference environment variables as `${NAME}`. References are resolved
//! against the `.env`-sourced environment; a server referencing an unset
//! variable is dropped from the resolved set with a recorded reason rather
//! than failing the whole load.

use crate::error::{Result, VidharvestError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Launch spec for one MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// The full server configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServersConfig {
    #[serde(rename = "mcpServers", default)]
    pub servers: BTreeMap<String, ServerEntry>,
}

/// A server dropped during resolution, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedServer {
    pub name: String,
    pub reason: String,
}

/// Extract the variable name from a `${NAME}` reference.
fn env_ref(value: &str) -> Option<&str> {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
}

/// Resolve a single `${NAME}` reference, treating unset and empty alike.
fn resolve_ref(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve environment-variable references in all server entries.
///
/// Returns the kept servers (with references substituted) and the list of
/// servers dropped because a referenced variable was unset.
pub fn resolve_env_refs(config: ServersConfig) -> (ServersConfig, Vec<SkippedServer>) {
    let mut kept = BTreeMap::new();
    let mut skipped = Vec::new();

    'servers: for (name, mut entry) in config.servers {
        for arg in entry.args.iter_mut() {
            if let Some(var) = env_ref(arg) {
                match resolve_ref(var) {
                    Some(value) => *arg = value,
                    None => {
                        warn!("Environment variable {} is not set; skipping server {}", var, name);
                        skipped.push(SkippedServer {
                            name,
                            reason: format!("environment variable {} is not set", var),
                        });
                        continue 'servers;
                    }
                }
            }
        }

        for value in entry.env.values_mut() {
            if let Some(var) = env_ref(value) {
                match resolve_ref(var) {
                    Some(resolved) => *value = resolved,
                    None => {
                        warn!("Environment variable {} is not set; skipping server {}", var, name);
                        skipped.push(SkippedServer {
                            name,
                            reason: format!("environment variable {} is not set", var),
                        });
                        continue 'servers;
                    }
                }
            }
        }

        kept.insert(name, entry);
    }

    (ServersConfig { servers: kept }, skipped)
}

/// Load and resolve a server configuration file.
pub fn load_servers_config(path: &Path) -> Result<(ServersConfig, Vec<SkippedServer>)> {
    // Pull in .env before resolving references
    dotenvy::dotenv().ok();

    if !path.exists() {
        return Err(VidharvestError::Config(format!(
            "Server config file {} does not exist",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let config: ServersConfig = serde_json::from_str(&content)?;
    Ok(resolve_env_refs(config))
}
