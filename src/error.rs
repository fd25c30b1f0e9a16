//! Error types for vidharvest.

use thiserror::Error;

/// Why an upstream API call was rejected.
///
/// Derived from the HTTP status code and, for 403 responses, known markers
/// in the response body (the YouTube Data API reports quota exhaustion and
/// disabled comments both as 403).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCause {
    /// Daily API quota exhausted.
    QuotaExceeded,
    /// API key invalid or lacking permission.
    Forbidden,
    /// Comments are disabled for the requested video.
    CommentsDisabled,
    /// Upstream has no matching resource.
    NotFound,
    /// Anything else (transport-level 5xx, unexpected 4xx).
    Other,
}

impl std::fmt::Display for UpstreamCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamCause::QuotaExceeded => {
                write!(f, "API quota exceeded; try again tomorrow or request a quota increase")
            }
            UpstreamCause::Forbidden => {
                write!(f, "access forbidden; check your API key and permissions")
            }
            UpstreamCause::CommentsDisabled => write!(f, "comments are disabled for this video"),
            UpstreamCause::NotFound => write!(f, "resource not found upstream"),
            UpstreamCause::Other => write!(f, "upstream request failed"),
        }
    }
}

/// Library-level error type for vidharvest operations.
#[derive(Error, Debug)]
pub enum VidharvestError {
    #[error("Could not extract a video ID from: {0}")]
    InvalidReference(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Upstream API error (HTTP {status}): {cause}")]
    Upstream { status: u16, cause: UpstreamCause },

    #[error("Persistence failed after {processed} comments: {message}")]
    Persistence { processed: usize, message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for vidharvest operations.
pub type Result<T> = std::result::Result<T, VidharvestError>;
