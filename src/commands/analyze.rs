//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads trace data from a file or inline JSON
//! 2. Normalizes every record into the canonical shape
//! 3. Computes the set-intersection aggregation
//! 4. Renders the UpSet chart (if requested)
//! 5. Writes output files

use crate::aggregator::{compute_upset_data, TraceSummary};
use crate::output::{write_html, write_report};
use crate::parser::schema::Report;
use crate::parser::traces::parse_traces;
use crate::plot::{PlotConfig, UpSetPlot};
use crate::utils::config::MAX_PLOT_DIMENSION;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to a traces JSON file, or an inline JSON document
    pub input: String,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Output path for the HTML chart (optional)
    pub output_html: Option<PathBuf>,

    /// Plot configuration
    pub plot_config: PlotConfig,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: String::new(),
            output_json: PathBuf::from("report.json"),
            output_html: None,
            plot_config: PlotConfig::default(),
            print_summary: false,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// Ok if analysis succeeds, Err with context if any step fails
///
/// # Errors
/// * Trace parsing errors
/// * Plot rendering errors
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", preview_input(&args.input));

    // Step 1: Load and normalize traces
    info!("Step 1/4: Loading and normalizing traces...");
    let traces = parse_traces(&args.input).context("Failed to parse trace data")?;

    debug!("Normalized {} traces", traces.len());

    // Step 2: Aggregate
    info!("Step 2/4: Computing set intersections...");
    let upset_data = compute_upset_data(&traces);
    let summary = TraceSummary::from_upset_data(&upset_data);

    info!("Aggregation: {}", summary.summary());

    // Step 3: Render chart (if requested)
    let html_content = if args.output_html.is_some() {
        info!("Step 3/4: Rendering UpSet chart...");
        let plot = UpSetPlot::new(upset_data.clone(), args.plot_config.clone());
        let html = plot.render().context("Failed to render UpSet chart")?;
        Some(html)
    } else {
        info!("Step 3/4: Skipping chart rendering (not requested)");
        None
    };

    // Step 4: Write outputs
    info!("Step 4/4: Writing output files...");

    let report = Report::new(upset_data);
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if let (Some(html), Some(html_path)) = (html_content, &args.output_html) {
        write_html(&html, html_path).context("Failed to write UpSet chart HTML")?;

        info!("✓ Chart written to: {}", html_path.display());
    }

    if args.print_summary {
        print_summary(&report, &summary);
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Print a text summary of the analysis to stdout
///
/// **Private** - internal helper for execute_analyze
fn print_summary(report: &Report, summary: &TraceSummary) {
    println!("\n{}", "=".repeat(80));
    println!("TRACE SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Total Traces:  {}", summary.total_traces);
    println!("Unique Tools:  {}", summary.unique_tools);
    println!("Combinations:  {}", summary.unique_combinations);
    println!("\nTop combinations:");
    for intersection in report.data.intersections.iter().take(10) {
        let combo = if intersection.sets.is_empty() {
            "(no tools)".to_string()
        } else {
            intersection.sets.join(", ")
        };
        println!("  {:>5}  {}", intersection.size, combo);
    }
    println!("{}", "=".repeat(80));
}

/// Shorten the input argument for log lines
///
/// **Private** - inline JSON documents can be arbitrarily long
fn preview_input(input: &str) -> String {
    if input.len() <= 64 {
        input.to_string()
    } else {
        format!("<inline JSON, {} bytes>", input.len())
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.is_empty() {
        anyhow::bail!("Input cannot be empty");
    }

    let config = &args.plot_config;

    if config.width == 0 || config.height == 0 {
        anyhow::bail!("Plot dimensions must be greater than 0");
    }

    if config.width > MAX_PLOT_DIMENSION || config.height > MAX_PLOT_DIMENSION {
        anyhow::bail!("Plot dimensions are too large (max {})", MAX_PLOT_DIMENSION);
    }

    if config.bar_color.is_empty() || config.highlight_color.is_empty() {
        anyhow::bail!("Plot colors cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = AnalyzeArgs {
            input: "traces.json".to_string(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = AnalyzeArgs::default();

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_dimension() {
        let args = AnalyzeArgs {
            input: "traces.json".to_string(),
            plot_config: PlotConfig::new().with_size(0, 500),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_oversized_dimension() {
        let args = AnalyzeArgs {
            input: "traces.json".to_string(),
            plot_config: PlotConfig::new().with_size(800, 50_000),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_color() {
        let args = AnalyzeArgs {
            input: "traces.json".to_string(),
            plot_config: PlotConfig::new().with_bar_color(""),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_analyze_writes_outputs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let json_path = temp_dir.path().join("report.json");
        let html_path = temp_dir.path().join("plot.html");

        let args = AnalyzeArgs {
            input: r#"[{"id": "1", "tool_calls": ["a", "b"]}, {"id": "2", "tool_calls": ["a"]}]"#
                .to_string(),
            output_json: json_path.clone(),
            output_html: Some(html_path.clone()),
            ..Default::default()
        };

        execute_analyze(args).unwrap();

        assert!(json_path.exists());
        assert!(html_path.exists());
    }

    #[test]
    fn test_execute_analyze_rejects_garbage_input() {
        let args = AnalyzeArgs {
            input: "definitely not json".to_string(),
            output_json: PathBuf::from("unused.json"),
            ..Default::default()
        };

        assert!(execute_analyze(args).is_err());
    }
}
