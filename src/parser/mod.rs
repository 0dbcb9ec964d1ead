//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Normalizing raw trace records from heterogeneous agent frameworks
//! - Loading trace documents from files, strings, or in-memory JSON
//! - Defining the canonical trace shape and the report schema

pub mod schema;
pub mod traces;

// Re-export main types
pub use schema::{Intersection, Report, Trace, UpsetData};
pub use traces::{extract_tool_calls, normalize_trace, parse_trace_values, parse_traces};
