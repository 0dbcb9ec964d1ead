//! Interactive UpSet plot generation.
//!
//! Turns aggregated set-intersection data into a self-contained HTML
//! document rendered with D3.js.

pub mod generator;

// Re-export main types
pub use generator::{PlotConfig, UpSetPlot};
