//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Field names for trace normalization (different agent frameworks use
// different names). Checked in the order listed; extend here to accept
// additional vocabularies.

/// Keys that identify a trace, in priority order
pub const ID_FIELD_NAMES: &[&str] = &["id", "trace_id"];

/// Keys that hold the list of tool invocations for a trace
pub const TOOL_CALL_FIELD_NAMES: &[&str] = &["tool_calls", "toolCalls", "calls", "steps"];

/// Keys that hold the tool name inside a structured invocation entry,
/// in priority order
pub const TOOL_NAME_FIELD_NAMES: &[&str] = &[
    "name",
    "tool",
    "tool_name",
    "toolName",
    "function",
    "type",
];

/// Key holding passthrough metadata on an already-canonical trace
pub const METADATA_FIELD_NAME: &str = "metadata";

// Plot defaults, matching the stock UpSet chart dimensions
pub const DEFAULT_PLOT_TITLE: &str = "Agent Tool Usage - UpSet Plot";
pub const DEFAULT_PLOT_WIDTH: usize = 800;
pub const DEFAULT_PLOT_HEIGHT: usize = 500;
pub const DEFAULT_BAR_COLOR: &str = "#4a90d9";
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#f5a623";

/// Upper bound for plot dimensions accepted from the CLI
pub const MAX_PLOT_DIMENSION: usize = 10_000;
