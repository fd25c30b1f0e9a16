//! Video ID extraction from YouTube URL forms.

use regex::Regex;
use std::sync::OnceLock;

/// URL patterns tried in priority order: the combined canonical/short/embed
/// form first, then watch URLs where `v=` is not the first query parameter.
fn patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
                .expect("invalid video URL pattern"),
            Regex::new(r"youtube\.com/watch\?.*v=([^&\n?#]+)")
                .expect("invalid watch URL pattern"),
        ]
    })
}

/// Extract a video ID from a YouTube URL.
///
/// Tries each known URL shape in order and returns the first captured ID.
/// Returns `None` when no pattern matches; the caller decides whether that
/// is an error.
pub fn extract_video_id(url: &str) -> Option<String> {
    for pattern in patterns() {
        if let Some(caps) = pattern.captures(url) {
            if let Some(id) = caps.get(1) {
                return Some(id.as_str().to_string());
            }
        }
    }
    None
}
