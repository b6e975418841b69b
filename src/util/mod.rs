//! Utility functions for common operations.
//!
//! Currently just text processing: status feeds carry HTML fragments in
//! their summaries, which must be flattened to plain text before they
//! are fit for a log line.

mod text;

pub use text::strip_html;
