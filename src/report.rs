//! Reporting sink for newly detected entries.
//!
//! The [`Reporter`] trait is the seam between the poll scheduler and
//! whatever consumes new entries; the scheduler logs and swallows any
//! failure, so a broken sink can never take the polling loop down.

use thiserror::Error;

use crate::feed::FeedEntry;

/// A report sink refused or failed to accept an entry.
#[derive(Debug, Error)]
#[error("Report sink failed: {0}")]
pub struct ReportError(pub String);

/// Sink for newly detected feed entries.
///
/// Implementations must be cheap and non-blocking; they run inline in
/// each feed's pipeline task.
pub trait Reporter: Send + Sync {
    /// Emits one record for a new entry. Field presence matters more
    /// than formatting: source feed, title, timestamp, and details must
    /// all be carried.
    fn report(&self, feed_url: &str, entry: &FeedEntry) -> Result<(), ReportError>;
}

/// Reporter that writes one structured log record per entry.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, feed_url: &str, entry: &FeedEntry) -> Result<(), ReportError> {
        tracing::info!(
            feed = %feed_url,
            service = %entry.title,
            time = %entry.updated.format("%Y-%m-%d %H:%M:%S"),
            details = %entry.summary,
            "New status entry"
        );
        Ok(())
    }
}
