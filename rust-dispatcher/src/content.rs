//! Post body excerpting for webhook payloads.
//!
//! Platforms receive a plain-text excerpt of the post rather than the raw
//! Hugo markdown: front matter is stripped, embedded HTML flattened to text,
//! and the body capped to its first lines with a link back to the original.

use std::path::Path;

use scraper::Html;
use tracing::debug;

use crate::store::QueueEntry;

/// Maximum number of non-empty body lines included in an excerpt.
const EXCERPT_LINES: usize = 24;

/// Build the delivery body for a queue entry.
///
/// Falls back to the title and post link when the markdown file is missing
/// or unreadable.
pub fn build_body(posts_dir: &Path, entry: &QueueEntry) -> String {
    let file = entry.file.trim();
    if file.is_empty() {
        return fallback_body(entry);
    }

    let path = posts_dir.join(file);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "post_file_unreadable");
            return fallback_body(entry);
        }
    };

    let body = html_to_plain(strip_front_matter(&raw));

    let excerpt: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(EXCERPT_LINES)
        .collect();

    format!("{}\n\nOriginal post: {}", excerpt.join("\n"), entry.url)
}

fn fallback_body(entry: &QueueEntry) -> String {
    format!("{}\n\nOriginal post: {}", entry.title, entry.url)
}

/// Drop a leading `---`-delimited front matter block.
pub fn strip_front_matter(text: &str) -> &str {
    if text.starts_with("---") {
        let parts: Vec<&str> = text.splitn(3, "---").collect();
        if parts.len() == 3 {
            return parts[2].trim();
        }
    }
    text.trim()
}

/// Flatten an HTML-bearing markdown body to plain text.
///
/// `<br>` variants become newlines, all other tags are dropped, and runs of
/// three or more newlines collapse to a blank line.
pub fn html_to_plain(text: &str) -> String {
    let normalized = text
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n");

    let fragment = Html::parse_fragment(&normalized);
    let mut plain: String = fragment.root_element().text().collect();

    while plain.contains("\n\n\n") {
        plain = plain.replace("\n\n\n", "\n\n");
    }

    plain.trim().to_string()
}
