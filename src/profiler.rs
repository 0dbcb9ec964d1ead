//! Unified profiler interface for the library.
//!
//! `AgentProfiler` owns a collection of normalized traces and a lazily
//! computed aggregation cache. Loading or adding traces invalidates the
//! cache; it is recomputed on the next read. Single-threaded by design:
//! there is no interior mutability and no locking.

use crate::aggregator::{compute_upset_data, TraceSummary};
use crate::output::{write_html, write_report};
use crate::parser::schema::{Report, Trace, UpsetData};
use crate::parser::traces::{normalize_trace, parse_trace_values, parse_traces};
use crate::plot::{PlotConfig, UpSetPlot};
use crate::utils::error::{OutputError, ParseError, PlotError};
use log::debug;
use serde_json::Value;
use std::path::Path;

/// Convert agent tracings to interactive UpSet plots
///
/// **Public** - the high-level entry point for library users
///
/// Typical usage:
/// ```ignore
/// let mut profiler = AgentProfiler::from_input("traces.json")?;
/// println!("{}", profiler.summary().summary());
/// profiler.save_html("tools.html", PlotConfig::default())?;
/// ```
#[derive(Debug, Default)]
pub struct AgentProfiler {
    traces: Vec<Trace>,
    upset_data: Option<UpsetData>,
}

impl AgentProfiler {
    /// Create an empty profiler; traces can be loaded later
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler and load traces from a file path or JSON string
    pub fn from_input(input: &str) -> Result<Self, ParseError> {
        let mut profiler = Self::new();
        profiler.load(input)?;
        Ok(profiler)
    }

    /// Replace the trace collection from a file path or JSON string
    ///
    /// **Public** - returns `&mut Self` for method chaining
    pub fn load(&mut self, input: &str) -> Result<&mut Self, ParseError> {
        self.traces = parse_traces(input)?;
        self.upset_data = None; // Reset cached data
        Ok(self)
    }

    /// Replace the trace collection from an in-memory JSON value
    pub fn load_values(&mut self, value: &Value) -> Result<&mut Self, ParseError> {
        self.traces = parse_trace_values(value)?;
        self.upset_data = None; // Reset cached data
        Ok(self)
    }

    /// Append a single raw trace record
    pub fn add_trace(&mut self, trace: &Value) -> Result<&mut Self, ParseError> {
        let normalized = normalize_trace(trace)?;
        self.traces.push(normalized);
        self.upset_data = None; // Reset cached data
        Ok(self)
    }

    /// Append multiple raw trace records
    pub fn add_traces(&mut self, value: &Value) -> Result<&mut Self, ParseError> {
        let mut normalized = parse_trace_values(value)?;
        self.traces.append(&mut normalized);
        self.upset_data = None; // Reset cached data
        Ok(self)
    }

    /// The loaded traces, in load order
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Total number of loaded traces
    pub fn num_traces(&self) -> usize {
        self.traces.len()
    }

    /// The computed aggregation data, recomputed only after mutations
    ///
    /// **Public** - memoized; the borrow is read-only derived state
    pub fn upset_data(&mut self) -> &UpsetData {
        let traces = &self.traces;
        self.upset_data.get_or_insert_with(|| {
            debug!("Computing upset data for {} traces", traces.len());
            compute_upset_data(traces)
        })
    }

    /// All distinct tools found in the traces, sorted
    pub fn tools(&mut self) -> Vec<String> {
        self.upset_data().sets.clone()
    }

    /// Summary statistics for the loaded traces
    pub fn summary(&mut self) -> TraceSummary {
        TraceSummary::from_upset_data(self.upset_data())
    }

    /// Create an UpSet plot over the current aggregation data
    pub fn plot(&mut self, config: PlotConfig) -> UpSetPlot {
        UpSetPlot::new(self.upset_data().clone(), config)
    }

    /// Render the UpSet plot to an HTML string
    pub fn to_html(&mut self, config: PlotConfig) -> Result<String, PlotError> {
        self.plot(config).render()
    }

    /// Render the UpSet plot and write it to an HTML file
    pub fn save_html(
        &mut self,
        path: impl AsRef<Path>,
        config: PlotConfig,
    ) -> Result<(), OutputError> {
        let html = self.to_html(config).map_err(|e| match e {
            PlotError::SerializationFailed(err) => OutputError::SerializationFailed(err),
        })?;
        write_html(&html, path)
    }

    /// Write the aggregation data to a JSON report file
    pub fn save_report(&mut self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        let report = Report::new(self.upset_data().clone());
        write_report(&report, path)
    }
}
