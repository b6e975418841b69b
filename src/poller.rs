//! The poll scheduler: one cycle fans out an independent pipeline per
//! feed, joins them all, and the loop sleeps until the next tick.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::feed::{
    fetch_conditional, parse_entries, FeedCacheEntry, FetchOutcome,
};
use crate::report::Reporter;

/// Maximum feed pipelines in flight at once within a cycle.
const MAX_CONCURRENT_POLLS: usize = 10;

/// Per-feed slot: the immutable URL plus the cycle-to-cycle cache state.
///
/// Owned by the [`Poller`]; each cycle hands exactly one `&mut` to one
/// pipeline task, so entries are never mutated concurrently.
struct FeedState {
    url: String,
    cache: FeedCacheEntry,
}

/// How one feed's pipeline ended for a cycle.
enum FeedCycleResult {
    /// Changed body processed; payload is the number of new entries.
    Reported(usize),
    /// 304 — nothing to parse.
    Unchanged,
    /// Fetch or parse failed; logged, feed retries next cycle.
    Failed,
}

/// Counters for one full pass over all configured feeds.
#[derive(Debug, Default, PartialEq)]
pub struct CycleStats {
    pub new_entries: usize,
    pub unchanged: usize,
    pub failures: usize,
}

/// Long-lived polling scheduler.
///
/// Owns all per-feed cache state for the process lifetime; nothing is
/// persisted across restarts. The only unrecoverable condition is an
/// empty feed list, which config validation rejects before a `Poller`
/// can be built.
pub struct Poller {
    client: reqwest::Client,
    reporter: Arc<dyn Reporter>,
    interval: Duration,
    feeds: Vec<FeedState>,
}

impl Poller {
    /// Builds a poller from validated config: one cache slot per feed
    /// and a shared HTTP client carrying the request timeout.
    pub fn new(config: &Config, reporter: Arc<dyn Reporter>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        let feeds = config
            .feeds
            .iter()
            .map(|url| FeedState {
                url: url.clone(),
                cache: FeedCacheEntry::new(config.max_tracked_ids),
            })
            .collect();

        Ok(Self {
            client,
            reporter,
            interval: Duration::from_secs(config.poll_interval_seconds),
            feeds,
        })
    }

    /// Runs the polling loop until the process is terminated.
    ///
    /// The first cycle starts immediately. A cycle that outlasts the
    /// interval does not overlap the next one: all pipelines are joined
    /// before the next tick, and missed ticks are skipped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let stats = self.run_cycle().await;
            tracing::debug!(
                new_entries = stats.new_entries,
                unchanged = stats.unchanged,
                failures = stats.failures,
                "Cycle complete"
            );
        }
    }

    /// Polls every configured feed once, concurrently, and joins.
    ///
    /// Feeds never wait on each other: a slow or failing feed only
    /// delays its own pipeline. Within a pipeline the order is strictly
    /// fetch → validators → parse → diff → report.
    pub async fn run_cycle(&mut self) -> CycleStats {
        let client = &self.client;
        let reporter = &*self.reporter;

        // Built eagerly as a Vec (futures stay inert until polled) so the
        // map closure has a concrete lifetime; mapping on the stream trips
        // a rustc higher-ranked lifetime limitation inside tokio::spawn.
        let pipelines: Vec<_> = self
            .feeds
            .iter_mut()
            .map(|state| poll_feed(client, reporter, state))
            .collect();
        let results: Vec<FeedCycleResult> = stream::iter(pipelines)
            .buffer_unordered(MAX_CONCURRENT_POLLS)
            .collect()
            .await;

        let mut stats = CycleStats::default();
        for result in results {
            match result {
                FeedCycleResult::Reported(count) => stats.new_entries += count,
                FeedCycleResult::Unchanged => stats.unchanged += 1,
                FeedCycleResult::Failed => stats.failures += 1,
            }
        }
        stats
    }
}

/// One feed's fetch-parse-report pipeline for one cycle.
///
/// Every failure path logs with the feed URL and resolves to a result
/// the cycle can count; nothing propagates out of the pipeline.
async fn poll_feed(
    client: &reqwest::Client,
    reporter: &dyn Reporter,
    state: &mut FeedState,
) -> FeedCycleResult {
    let outcome = match fetch_conditional(client, &state.url, &state.cache).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(feed = %state.url, error = %e, "Fetch failed, will retry next cycle");
            return FeedCycleResult::Failed;
        }
    };

    let body = match outcome {
        FetchOutcome::NotModified => {
            tracing::debug!(feed = %state.url, "Feed unchanged");
            return FeedCycleResult::Unchanged;
        }
        FetchOutcome::Changed {
            body,
            etag,
            last_modified,
        } => {
            state.cache.apply_validators(etag, last_modified);
            body
        }
    };

    let entries = match parse_entries(&body) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(feed = %state.url, error = %e, "Unparseable feed body");
            return FeedCycleResult::Failed;
        }
    };

    let new_entries = state.cache.filter_new(entries);
    for entry in &new_entries {
        if let Err(e) = reporter.report(&state.url, entry) {
            // A broken sink must not stop the scheduler; the entry stays
            // marked seen and is dropped.
            tracing::warn!(feed = %state.url, entry_id = %entry.id, error = %e, "Report failed");
        }
    }

    FeedCycleResult::Reported(new_entries.len())
}
