//! Set-intersection aggregation over normalized traces.
//!
//! Groups traces by the distinct combination of tools they used, counts
//! occurrences per unique combination, and orders the table for display.
//! Both operations here are pure; caching recomputed results is the
//! profiler wrapper's concern.

use crate::parser::schema::{Intersection, Trace, UpsetData};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct tools used by one trace
///
/// **Public** - order and duplicates of `tool_calls` are discarded
pub fn tool_set_of(trace: &Trace) -> BTreeSet<String> {
    trace.tool_calls.iter().cloned().collect()
}

/// Distinct tool sets for every trace, in trace order
///
/// **Public** - used by compute_upset_data and tests
pub fn extract_tool_sets(traces: &[Trace]) -> Vec<BTreeSet<String>> {
    traces.iter().map(tool_set_of).collect()
}

/// Compute the set-intersection table consumed by the UpSet plot
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `traces` - Normalized traces from the parser
///
/// # Returns
/// `UpsetData` with the sorted tool universe, the ranked combination-count
/// table, and the total trace count
///
/// # Algorithm
/// 1. Union every trace's tool set into the sorted universe
/// 2. Group traces by their sorted distinct tool combination (the empty
///    combination is a valid key, for traces that invoked no tools)
/// 3. Rank combinations by count descending, ties by combination ascending
pub fn compute_upset_data(traces: &[Trace]) -> UpsetData {
    let tool_sets = extract_tool_sets(traces);

    let mut all_tools: BTreeSet<String> = BTreeSet::new();
    for tool_set in &tool_sets {
        all_tools.extend(tool_set.iter().cloned());
    }

    let mut combination_counts: BTreeMap<Vec<String>, u64> = BTreeMap::new();
    for tool_set in tool_sets {
        let key: Vec<String> = tool_set.into_iter().collect();
        *combination_counts.entry(key).or_insert(0) += 1;
    }

    // BTreeMap iteration is ascending by combination; the stable sort by
    // count keeps that ordering as the tie-break.
    let mut intersections: Vec<Intersection> = combination_counts
        .into_iter()
        .map(|(sets, size)| Intersection { sets, size })
        .collect();
    intersections.sort_by(|a, b| b.size.cmp(&a.size));

    debug!(
        "Aggregated {} traces into {} combinations over {} tools",
        traces.len(),
        intersections.len(),
        all_tools.len()
    );

    UpsetData {
        sets: all_tools.into_iter().collect(),
        intersections,
        total_traces: traces.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn trace(id: &str, tools: &[&str]) -> Trace {
        Trace {
            id: id.to_string(),
            tool_calls: tools.iter().map(|t| t.to_string()).collect(),
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_tool_set_discards_order_and_duplicates() {
        let set = tool_set_of(&trace("1", &["read", "search", "read"]));
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec!["read".to_string(), "search".to_string()]
        );
    }

    #[test]
    fn test_compute_upset_data_basic() {
        let traces = vec![
            trace("1", &["a", "b"]),
            trace("2", &["a", "b"]),
            trace("3", &["a"]),
        ];

        let data = compute_upset_data(&traces);

        assert_eq!(data.sets, vec!["a", "b"]);
        assert_eq!(data.total_traces, 3);
        assert_eq!(data.intersections.len(), 2);
        assert_eq!(data.intersections[0].sets, vec!["a", "b"]);
        assert_eq!(data.intersections[0].size, 2);
        assert_eq!(data.intersections[1].sets, vec!["a"]);
        assert_eq!(data.intersections[1].size, 1);
    }

    #[test]
    fn test_compute_upset_data_tie_break_is_lexicographic() {
        let traces = vec![
            trace("1", &["b"]),
            trace("2", &["a"]),
            trace("3", &["a", "c"]),
        ];

        let data = compute_upset_data(&traces);

        // All counts equal; combinations come out ascending
        let keys: Vec<&[String]> = data
            .intersections
            .iter()
            .map(|i| i.sets.as_slice())
            .collect();
        assert_eq!(keys[0], ["a".to_string()]);
        assert_eq!(keys[1], ["a".to_string(), "c".to_string()]);
        assert_eq!(keys[2], ["b".to_string()]);
    }

    #[test]
    fn test_compute_upset_data_empty_input() {
        let data = compute_upset_data(&[]);
        assert!(data.sets.is_empty());
        assert!(data.intersections.is_empty());
        assert_eq!(data.total_traces, 0);
    }

    #[test]
    fn test_compute_upset_data_empty_tool_set_is_counted() {
        let traces = vec![trace("1", &["a"]), trace("2", &[]), trace("3", &[])];

        let data = compute_upset_data(&traces);

        assert_eq!(data.sets, vec!["a"]);
        assert_eq!(data.total_traces, 3);
        let empty = data
            .intersections
            .iter()
            .find(|i| i.sets.is_empty())
            .expect("empty combination present");
        assert_eq!(empty.size, 2);

        let counted: u64 = data.intersections.iter().map(|i| i.size).sum();
        assert_eq!(counted as usize, data.total_traces);
    }

    #[test]
    fn test_compute_upset_data_sets_sorted_and_deduplicated() {
        let traces = vec![trace("1", &["c", "a"]), trace("2", &["b", "a"])];

        let data = compute_upset_data(&traces);

        assert_eq!(data.sets, vec!["a", "b", "c"]);
    }
}
