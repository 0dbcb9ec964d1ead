//! Output file writers.
//!
//! JSON report and HTML chart writers with shared path validation.

pub mod html;
pub mod json;

// Re-export main functions
pub use html::write_html;
pub use json::{read_report, write_report};
