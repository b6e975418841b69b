use chrono::{DateTime, Utc};
use feed_rs::parser;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::util::strip_html;

/// Feed body could not be parsed as RSS or Atom.
#[derive(Debug, Error)]
#[error("Parse error: {0}")]
pub struct ParseError(#[from] feed_rs::parser::ParseFeedError);

/// One incident/update record extracted from a feed document.
///
/// Transient: parsed fresh each cycle and dropped once its id has been
/// checked against (and recorded in) the feed's seen set.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Stable identifier — feed-supplied id, else the entry link, else
    /// a digest of the remaining fields.
    pub id: String,
    pub title: String,
    pub updated: DateTime<Utc>,
    pub summary: String,
}

/// Parses raw feed bytes into entries, in the feed's native order.
///
/// The format (RSS or Atom) is auto-detected from the document content
/// by `feed-rs`; callers never indicate a format. Entries with no
/// usable timestamp (neither `updated` nor `published`) are dropped —
/// there is nothing meaningful to report for them.
///
/// # Errors
///
/// Returns [`ParseError`] if the bytes are not a well-formed feed.
pub fn parse_entries(bytes: &[u8]) -> Result<Vec<FeedEntry>, ParseError> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let updated = match entry.updated.or(entry.published) {
                Some(ts) => ts,
                None => {
                    tracing::debug!(entry_id = %entry.id, "Entry has no timestamp, skipping");
                    return None;
                }
            };

            let link = entry.links.first().map(|l| l.href.clone());
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Unknown Service".to_string());
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();

            let id = stable_id(&entry.id, link.as_deref(), &title, updated);

            Some(FeedEntry {
                id,
                title,
                updated,
                summary: strip_html(&summary),
            })
        })
        .collect();

    Ok(entries)
}

/// Picks a stable identifier for an entry.
///
/// Preference order: the feed-supplied id (GUID), then the entry link,
/// then a SHA-256 digest of link|title|timestamp as a last resort so
/// that id-less entries still deduplicate across cycles.
fn stable_id(
    existing: &str,
    link: Option<&str>,
    title: &str,
    updated: DateTime<Utc>,
) -> String {
    let trimmed = existing.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    // Normalized once: a whitespace-only link must behave exactly like
    // an absent one, in the digest as well as the fallback chain.
    match link.map(str::trim).filter(|l| !l.is_empty()) {
        Some(link) => link.to_string(),
        None => {
            let input = format!("|{}|{}", title, updated.timestamp());
            let hash = Sha256::digest(input.as_bytes());
            format!("{:x}", hash)
        }
    }
}
