//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a stored video summary line.
    pub fn video_line(title: &str, id: &str, comments: usize, views: u64) {
        println!(
            "  {} {} ({}, {} comments, {} views)",
            style("*").cyan(),
            style(title).bold(),
            style(id).dim(),
            comments,
            views
        );
    }

    /// Print a search result.
    pub fn search_result(title: &str, id: &str, channel: &str, description: &str) {
        println!(
            "\n{} {} {}",
            style(">>").green(),
            style(title).bold(),
            style(format!("[{}]", id)).dim()
        );
        println!("   {}", style(channel).cyan());
        if !description.is_empty() {
            println!("   {}", content_preview(description, 200));
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content to at most `max_len` characters, with ellipsis.
fn content_preview(content: &str, max_len: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_len {
        content
    } else {
        let truncated: String = content.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview_within_limit_is_unchanged() {
        assert_eq!(content_preview("short text", 20), "short text");
        assert_eq!(content_preview("line\nbreak", 20), "line break");
    }

    #[test]
    fn test_content_preview_measures_chars_not_bytes() {
        // 120 chars but 240 bytes; fits the limit and must not be truncated
        let text = "æøå".repeat(40);
        assert_eq!(content_preview(&text, 120), text);

        let truncated = content_preview(&text, 100);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 103);
    }
}
