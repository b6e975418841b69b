//! statuswatch — polls RSS/Atom status feeds and reports newly
//! published incident entries.
//!
//! The core is a polling-and-dedup loop: per feed, one conditional GET
//! per cycle (`If-None-Match` / `If-Modified-Since` from cached
//! validators), format-agnostic parsing of changed bodies, and a
//! bounded seen-id set so an incident is reported exactly once. Feeds
//! are polled concurrently and independently; any per-feed failure is
//! logged and retried on the next cycle, never fatal.
//!
//! Module map:
//!
//! - [`config`] - TOML configuration (feed list, intervals, limits)
//! - [`feed`] - cache state, conditional fetcher, RSS/Atom parser
//! - [`poller`] - the cycle scheduler tying the pipeline together
//! - [`report`] - the sink for newly detected entries
//! - [`util`] - text helpers

pub mod config;
pub mod feed;
pub mod poller;
pub mod report;
pub mod util;
