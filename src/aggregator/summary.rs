//! Summary statistics derived from aggregated trace data.
//!
//! These are the headline numbers for logs and the `--summary` output:
//! how many traces, how many distinct tools, how many distinct
//! combinations, and which combination dominates.

use crate::parser::schema::{Intersection, UpsetData};
use serde::Serialize;

/// Summary of a trace collection
///
/// **Public** - returned from TraceSummary::from_upset_data
#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceSummary {
    /// Total number of traces
    pub total_traces: usize,

    /// Number of distinct tools across all traces
    pub unique_tools: usize,

    /// The distinct tools, sorted
    pub tools: Vec<String>,

    /// Number of distinct tool combinations
    pub unique_combinations: usize,

    /// The highest-ranked combination, if any traces were loaded
    pub most_common_combination: Option<Intersection>,
}

impl TraceSummary {
    /// Derive summary statistics from aggregated data
    ///
    /// **Public** - main entry point for summaries
    pub fn from_upset_data(data: &UpsetData) -> Self {
        Self {
            total_traces: data.total_traces,
            unique_tools: data.sets.len(),
            tools: data.sets.clone(),
            unique_combinations: data.intersections.len(),
            most_common_combination: data.intersections.first().cloned(),
        }
    }

    /// Share of traces covered by the most common combination, in percent
    ///
    /// **Public** - useful for spotting homogeneous trace collections
    pub fn most_common_share(&self) -> f64 {
        match &self.most_common_combination {
            Some(intersection) if self.total_traces > 0 => {
                (intersection.size as f64 / self.total_traces as f64) * 100.0
            }
            _ => 0.0,
        }
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the --summary flag
    pub fn summary(&self) -> String {
        let most_common = match &self.most_common_combination {
            Some(intersection) if intersection.sets.is_empty() => {
                format!("(no tools) x{}", intersection.size)
            }
            Some(intersection) => {
                format!("{} x{}", intersection.sets.join("+"), intersection.size)
            }
            None => "none".to_string(),
        };

        format!(
            "Traces: {} | Tools: {} | Combinations: {} | Most common: {} ({:.1}%)",
            self.total_traces,
            self.unique_tools,
            self.unique_combinations,
            most_common,
            self.most_common_share()
        )
    }
}
