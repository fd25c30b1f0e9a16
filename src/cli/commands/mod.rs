//! CLI command implementations.

mod chat;
mod config;
mod info;
mod list;
mod load;
mod mcp;
mod search;

pub use chat::run_chat;
pub use config::run_config;
pub use info::run_info;
pub use list::run_list;
pub use load::run_load;
pub use mcp::run_mcp;
pub use search::run_search;
