//! Canonical trace and output schema definitions.
//!
//! This module defines the normalized trace shape produced by the parser
//! and the structure of JSON reports we write to disk.
//! The report schema is versioned to allow future evolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::config::SCHEMA_VERSION;

/// A normalized agent trace, independent of the input schema variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Trace identifier (from the source record, or a generated fallback)
    pub id: String,

    /// Tool names in the order they were invoked; duplicates preserved
    pub tool_calls: Vec<String>,

    /// Every unrecognized field of the source record, passed through verbatim
    pub metadata: Map<String, Value>,
}

/// One distinct tool combination and how many traces used exactly it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// The tool combination, sorted lexicographically
    pub sets: Vec<String>,

    /// Number of traces whose tool set equals this combination
    pub size: u64,
}

/// Aggregated set-intersection data consumed by the UpSet plot
///
/// Renderers expect exactly the three fields below; they must ignore any
/// additional fields a containing document carries (open record shape).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpsetData {
    /// All distinct tool names across all traces, sorted, no duplicates
    pub sets: Vec<String>,

    /// Combination counts, ranked by size descending then combination ascending
    pub intersections: Vec<Intersection>,

    /// Number of input traces
    pub total_traces: usize,
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Aggregation data, flattened so renderers can read the three
    /// `UpsetData` fields directly off the document root
    #[serde(flatten)]
    pub data: UpsetData,
}

impl Report {
    /// Build a report around computed aggregation data
    ///
    /// **Public** - used by commands to create final output
    pub fn new(data: UpsetData) -> Self {
        use chrono::Utc;

        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            data,
        }
    }
}
