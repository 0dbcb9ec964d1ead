//! Trace normalization for heterogeneous agent tracing records.
//!
//! Agent frameworks disagree on how a trace spells its identifier, its list
//! of tool invocations, and the tool name inside each invocation entry.
//! This parser accepts all recognized spellings (see `utils::config`) and
//! normalizes every record into the canonical [`Trace`] shape without the
//! caller declaring which convention is in use.

use crate::parser::schema::Trace;
use crate::utils::config::{
    ID_FIELD_NAMES, METADATA_FIELD_NAME, TOOL_CALL_FIELD_NAMES, TOOL_NAME_FIELD_NAMES,
};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

// Counter backing the fallback trace id. Fallback ids are unique within the
// process but NOT stable across runs: normalizing equal-content input twice
// yields different ids. Callers that need stable ids must supply one.
static NEXT_FALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Parse agent tracing data from a string input
///
/// **Public** - main entry point for string and file inputs
///
/// The string is first treated as a filesystem location; only if no such
/// file exists is it parsed as an embedded JSON document. The document must
/// decode to a single record object or an array of records.
///
/// # Arguments
/// * `input` - Path to a JSON file, or a JSON document itself
///
/// # Returns
/// Normalized traces, in input order
///
/// # Errors
/// * `ParseError::InvalidDocument` - Neither an existing file nor valid JSON
/// * `ParseError::IoError` - An existing file could not be read
/// * `ParseError::UnsupportedInput` - Document decodes to a scalar
/// * `ParseError::InvalidRecord` - An entry is not a JSON object
pub fn parse_traces(input: &str) -> Result<Vec<Trace>, ParseError> {
    let path = Path::new(input);

    let document: Value = if path.exists() {
        debug!("Reading traces from file: {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| ParseError::InvalidDocument(format!("{}: {}", path.display(), e)))?
    } else {
        serde_json::from_str(input)
            .map_err(|e| ParseError::InvalidDocument(format!("{}: {}", preview(input), e)))?
    };

    parse_trace_values(&document)
}

/// Normalize already-deserialized trace data
///
/// **Public** - entry point for in-memory JSON values
///
/// A single record object is wrapped as a one-element collection; an array
/// is normalized element-wise. There is no partial-success mode: the first
/// non-object entry aborts the whole call.
///
/// # Errors
/// * `ParseError::UnsupportedInput` - Value is neither object nor array
/// * `ParseError::InvalidRecord` - An entry is not a JSON object
pub fn parse_trace_values(value: &Value) -> Result<Vec<Trace>, ParseError> {
    let records: &[Value] = match value {
        Value::Object(_) => std::slice::from_ref(value),
        Value::Array(records) => records.as_slice(),
        other => {
            return Err(ParseError::UnsupportedInput(
                json_type_name(other).to_string(),
            ))
        }
    };

    let mut traces = Vec::with_capacity(records.len());
    for record in records {
        traces.push(normalize_trace(record)?);
    }

    debug!("Normalized {} traces", traces.len());
    Ok(traces)
}

/// Normalize a single raw trace record
///
/// **Public** - used by parse_trace_values and the profiler wrapper
///
/// Missing identifiers, missing or malformed tool lists, and unresolvable
/// tool names are all tolerated; the only error is a non-object record.
pub fn normalize_trace(raw: &Value) -> Result<Trace, ParseError> {
    let record = raw
        .as_object()
        .ok_or_else(|| ParseError::InvalidRecord(json_type_name(raw).to_string()))?;

    Ok(Trace {
        id: extract_trace_id(record),
        tool_calls: extract_tool_calls(record),
        metadata: extract_metadata(record),
    })
}

/// Extract the trace identifier, falling back to a generated one
///
/// **Private** - internal helper for normalize_trace
fn extract_trace_id(record: &Map<String, Value>) -> String {
    for key in ID_FIELD_NAMES {
        match record.get(*key) {
            Some(Value::String(id)) => return id.clone(),
            Some(Value::Number(id)) => return id.to_string(),
            _ => {}
        }
    }

    let n = NEXT_FALLBACK_ID.fetch_add(1, Ordering::Relaxed);
    debug!("Trace has no identifier field, assigned fallback id trace-{}", n);
    format!("trace-{}", n)
}

/// Extract tool call names from a trace record
///
/// **Public** - also used directly by tests and downstream tooling
///
/// Every recognized tool-list key contributes, in the fixed key order; a
/// trace carrying both e.g. `tool_calls` and `steps` yields the
/// concatenation of both lists. Within one list, encounter order is kept.
pub fn extract_tool_calls(record: &Map<String, Value>) -> Vec<String> {
    let mut tool_calls = Vec::new();

    for key in TOOL_CALL_FIELD_NAMES {
        let Some(value) = record.get(*key) else {
            continue;
        };
        let Some(entries) = value.as_array() else {
            warn!("Tool list field '{}' is not an array, skipping", key);
            continue;
        };
        for entry in entries {
            if let Some(name) = extract_tool_name(entry) {
                tool_calls.push(name);
            }
        }
    }

    tool_calls
}

/// Extract the tool name from a single invocation entry
///
/// **Private** - internal helper for extract_tool_calls
///
/// A plain string entry is the name itself. A structured entry is resolved
/// by checking the recognized name keys in priority order; the matched value
/// may be a string or an object exposing a string `name` field (one level of
/// indirection only). Entries yielding no name, or an empty one, resolve to
/// `None` and are dropped by the caller.
fn extract_tool_name(entry: &Value) -> Option<String> {
    let name = match entry {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => {
            TOOL_NAME_FIELD_NAMES
                .iter()
                .find_map(|key| match fields.get(*key) {
                    Some(Value::String(name)) => Some(name.clone()),
                    Some(Value::Object(inner)) => {
                        inner.get("name").and_then(Value::as_str).map(String::from)
                    }
                    _ => None,
                })
        }
        _ => None,
    };

    name.filter(|name| !name.is_empty())
}

/// Collect unrecognized fields into the metadata map
///
/// **Private** - internal helper for normalize_trace
///
/// An object under the `metadata` key merges through unchanged, which makes
/// normalizing an already-canonical trace idempotent. Top-level keys win
/// over merged entries on collision. A non-object `metadata` value is kept
/// under the `metadata` key verbatim.
fn extract_metadata(record: &Map<String, Value>) -> Map<String, Value> {
    let mut metadata = Map::new();

    if let Some(Value::Object(existing)) = record.get(METADATA_FIELD_NAME) {
        metadata.extend(existing.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    for (key, value) in record {
        if is_reserved_key(key) {
            continue;
        }
        metadata.insert(key.clone(), value.clone());
    }

    if let Some(value) = record.get(METADATA_FIELD_NAME) {
        if !value.is_object() {
            metadata.insert(METADATA_FIELD_NAME.to_string(), value.clone());
        }
    }

    metadata
}

/// Check whether a key is reserved (never copied to metadata)
///
/// **Private** - internal helper for extract_metadata
fn is_reserved_key(key: &str) -> bool {
    ID_FIELD_NAMES.contains(&key)
        || TOOL_CALL_FIELD_NAMES.contains(&key)
        || key == METADATA_FIELD_NAME
}

/// Map a JSON value to its type name for error messages
///
/// **Private** - internal utility
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncate a raw input string for inclusion in error messages
///
/// **Private** - internal utility
fn preview(input: &str) -> String {
    const PREVIEW_LIMIT: usize = 80;

    if input.len() <= PREVIEW_LIMIT {
        input.to_string()
    } else {
        let cut = input
            .char_indices()
            .take_while(|(i, _)| *i < PREVIEW_LIMIT)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &input[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_extract_tool_calls_name_format() {
        let trace = record(json!({"tool_calls": [{"name": "search"}, {"name": "read"}]}));
        assert_eq!(extract_tool_calls(&trace), vec!["search", "read"]);
    }

    #[test]
    fn test_extract_tool_calls_string_format() {
        let trace = record(json!({"tool_calls": ["search", "read"]}));
        assert_eq!(extract_tool_calls(&trace), vec!["search", "read"]);
    }

    #[test]
    fn test_extract_tool_calls_tool_key() {
        let trace = record(json!({"tool_calls": [{"tool": "search"}]}));
        assert_eq!(extract_tool_calls(&trace), vec!["search"]);
    }

    #[test]
    fn test_extract_tool_calls_camel_case_keys() {
        let trace = record(json!({"toolCalls": [{"toolName": "search"}]}));
        assert_eq!(extract_tool_calls(&trace), vec!["search"]);
    }

    #[test]
    fn test_extract_tool_calls_function_key() {
        let trace = record(json!({"calls": [{"function": "search"}]}));
        assert_eq!(extract_tool_calls(&trace), vec!["search"]);
    }

    #[test]
    fn test_extract_tool_calls_steps_key() {
        let trace = record(json!({"steps": [{"name": "search"}, {"name": "read"}]}));
        assert_eq!(extract_tool_calls(&trace), vec!["search", "read"]);
    }

    #[test]
    fn test_extract_tool_calls_mixed_entries() {
        let trace = record(json!({"calls": [{"function": "y"}, "z"]}));
        assert_eq!(extract_tool_calls(&trace), vec!["y", "z"]);
    }

    #[test]
    fn test_extract_tool_calls_nested_function_object() {
        // OpenAI-style entries resolve through the nested name field
        let trace = record(json!({
            "tool_calls": [{"type": "function", "function": {"name": "get_weather"}}]
        }));
        assert_eq!(extract_tool_calls(&trace), vec!["get_weather"]);
    }

    #[test]
    fn test_extract_tool_calls_union_across_keys() {
        let trace = record(json!({
            "tool_calls": ["a"],
            "steps": [{"name": "b"}]
        }));
        assert_eq!(extract_tool_calls(&trace), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_tool_calls_drops_unresolvable_entries() {
        let trace = record(json!({
            "tool_calls": [42, null, {"arguments": {}}, {"name": ""}, "ok"]
        }));
        assert_eq!(extract_tool_calls(&trace), vec!["ok"]);
    }

    #[test]
    fn test_extract_tool_calls_non_array_list_skipped() {
        let trace = record(json!({"tool_calls": "search"}));
        assert!(extract_tool_calls(&trace).is_empty());
    }

    #[test]
    fn test_normalize_trace_keeps_duplicates_and_order() {
        let trace = normalize_trace(&json!({
            "id": "t1",
            "tool_calls": ["read", "search", "read"]
        }))
        .unwrap();
        assert_eq!(trace.tool_calls, vec!["read", "search", "read"]);
    }

    #[test]
    fn test_normalize_trace_id_priority() {
        let trace = normalize_trace(&json!({"trace_id": "low", "id": "high"})).unwrap();
        assert_eq!(trace.id, "high");
    }

    #[test]
    fn test_normalize_trace_numeric_id() {
        let trace = normalize_trace(&json!({"id": 7, "tool_calls": []})).unwrap();
        assert_eq!(trace.id, "7");
    }

    #[test]
    fn test_normalize_trace_fallback_ids_unique() {
        let a = normalize_trace(&json!({"tool_calls": ["x"]})).unwrap();
        let b = normalize_trace(&json!({"tool_calls": ["x"]})).unwrap();
        assert!(a.id.starts_with("trace-"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_normalize_trace_metadata_passthrough() {
        let trace = normalize_trace(&json!({
            "id": "t1",
            "tool_calls": [],
            "model": "gpt-4",
            "latency_ms": 1234
        }))
        .unwrap();
        assert_eq!(trace.metadata["model"], json!("gpt-4"));
        assert_eq!(trace.metadata["latency_ms"], json!(1234));
        assert!(!trace.metadata.contains_key("id"));
        assert!(!trace.metadata.contains_key("tool_calls"));
    }

    #[test]
    fn test_normalize_trace_idempotent() {
        let raw = json!({
            "id": "t1",
            "tool_calls": ["search", "read"],
            "metadata": {"model": "gpt-4"}
        });
        let once = normalize_trace(&raw).unwrap();
        let twice = normalize_trace(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_trace_non_object_metadata_kept_verbatim() {
        let trace = normalize_trace(&json!({"id": "t1", "metadata": "opaque"})).unwrap();
        assert_eq!(trace.metadata["metadata"], json!("opaque"));
    }

    #[test]
    fn test_normalize_trace_rejects_non_object() {
        let err = normalize_trace(&json!("not a record")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRecord(_)));
    }

    #[test]
    fn test_parse_trace_values_wraps_single_record() {
        let traces = parse_trace_values(&json!({"id": "t1", "tool_calls": ["a"]})).unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].id, "t1");
    }

    #[test]
    fn test_parse_trace_values_rejects_scalar() {
        let err = parse_trace_values(&json!(12345)).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedInput(_)));
    }

    #[test]
    fn test_parse_trace_values_rejects_non_object_entry() {
        let err = parse_trace_values(&json!([{"id": "ok"}, 3])).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRecord(_)));
    }

    #[test]
    fn test_parse_traces_json_string() {
        let traces = parse_traces(r#"[{"id": "1", "tool_calls": [{"name": "search"}]}]"#).unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].tool_calls, vec!["search"]);
    }

    #[test]
    fn test_parse_traces_invalid_string() {
        let err = parse_traces("not valid json").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDocument(_)));
    }

    #[test]
    fn test_preview_truncates_long_input() {
        let long = "x".repeat(500);
        let shown = preview(&long);
        assert!(shown.len() < 100);
        assert!(shown.ends_with("..."));
    }
}
