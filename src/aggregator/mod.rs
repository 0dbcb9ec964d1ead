//! Aggregation of normalized traces into set-intersection data.
//!
//! This module transforms canonical traces into:
//! - The distinct-tool universe across all traces
//! - The ranked combination-count table (for the UpSet plot)
//! - Summary statistics (headline numbers for logs and reports)

pub mod summary;
pub mod upset;

// Re-export main types and functions
pub use summary::TraceSummary;
pub use upset::{compute_upset_data, extract_tool_sets, tool_set_of};
