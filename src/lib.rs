//! Agent Profiler
//!
//! Convert agent tracing data into interactive UpSet plot visualizations.
//!
//! This crate normalizes JSON-like agent traces from heterogeneous
//! frameworks into a canonical shape, computes multi-set intersection
//! statistics across traces (which distinct tool combinations occur, and
//! how often), and renders the result as a self-contained interactive
//! chart.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install agent-profiler
//! agent-profiler analyze --input traces.json --html tools.html
//! ```
//!
//! Library users start from [`profiler::AgentProfiler`]:
//!
//! ```ignore
//! use agent_profiler::profiler::AgentProfiler;
//! use agent_profiler::plot::PlotConfig;
//!
//! let mut profiler = AgentProfiler::from_input("traces.json")?;
//! println!("{}", profiler.summary().summary());
//! profiler.save_html("tools.html", PlotConfig::default())?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod plot;
pub mod profiler;
pub mod utils;
