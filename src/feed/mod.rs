//! Feed handling: conditional fetching, parsing, and per-feed state.
//!
//! The per-feed polling pipeline is built from three pieces:
//!
//! - [`cache`] - per-feed validators and the bounded seen-id set
//! - [`fetcher`] - one conditional GET per feed per cycle
//! - [`parser`] - format-agnostic RSS/Atom parsing via `feed-rs`
//!
//! The fetcher reads validators from a [`FeedCacheEntry`] and classifies
//! the response; the parser turns a changed body into [`FeedEntry`]
//! values; the cache entry's `filter_new` then drops everything already
//! reported. The poll scheduler (`crate::poller`) wires these together.

mod cache;
mod fetcher;
mod parser;

pub use cache::{FeedCacheEntry, DEFAULT_MAX_TRACKED_IDS};
pub use fetcher::{fetch_conditional, FetchError, FetchOutcome};
pub use parser::{parse_entries, FeedEntry, ParseError};
