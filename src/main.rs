//! Agent Profiler CLI
//!
//! Converts agent tracing data into set-intersection reports and
//! interactive UpSet plot visualizations.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use agent_profiler::aggregator::{compute_upset_data, TraceSummary};
use agent_profiler::commands::{execute_analyze, validate_args, AnalyzeArgs};
use agent_profiler::parser::parse_traces;
use agent_profiler::plot::PlotConfig;
use agent_profiler::utils::config::SCHEMA_VERSION;

/// Agent Profiler - UpSet plot visualizations for agent tool usage
#[derive(Parser, Debug)]
#[command(name = "agent-profiler")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze traces and write the report (and optionally the chart)
    Analyze {
        /// Path to a traces JSON file, or an inline JSON document
        #[arg(short, long)]
        input: String,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Output path for the interactive HTML chart (optional)
        #[arg(long)]
        html: Option<PathBuf>,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Minimum chart width in pixels
        #[arg(long, default_value = "800")]
        width: usize,

        /// Minimum chart height in pixels
        #[arg(long, default_value = "500")]
        height: usize,

        /// Color for intersection size bars
        #[arg(long, default_value = "#4a90d9")]
        bar_color: String,

        /// Color for hover highlighting
        #[arg(long, default_value = "#f5a623")]
        highlight_color: String,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a traces JSON file
    Validate {
        /// Path to traces JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            output,
            html,
            title,
            width,
            height,
            bar_color,
            highlight_color,
            summary,
        } => {
            let mut plot_config = PlotConfig::new()
                .with_size(width, height)
                .with_bar_color(bar_color)
                .with_highlight_color(highlight_color);

            if let Some(title_str) = title {
                plot_config = plot_config.with_title(title_str);
            }

            let args = AnalyzeArgs {
                input,
                output_json: output,
                output_html: html,
                plot_config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute analysis
            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_traces_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a traces JSON file
///
/// **Private** - internal command implementation
fn validate_traces_file(file_path: PathBuf) -> Result<()> {
    println!("Validating traces: {}", file_path.display());

    let traces = parse_traces(&file_path.to_string_lossy())?;
    let data = compute_upset_data(&traces);
    let summary = TraceSummary::from_upset_data(&data);

    println!("✓ Valid trace data");
    println!("  Traces: {}", data.total_traces);
    println!("  Unique Tools: {}", summary.unique_tools);
    println!("  Combinations: {}", summary.unique_combinations);
    if let Some(most_common) = &summary.most_common_combination {
        println!(
            "  Most Common: [{}] ({} traces)",
            most_common.sets.join(", "),
            most_common.size
        );
    }

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Agent Profiler Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string        - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string   - ISO 8601 timestamp");
        println!("  sets: array            - All distinct tool names, sorted");
        println!("  intersections: array   - Ranked tool-combination counts");
        println!("    sets: array          - The combination (sorted tool names)");
        println!("    size: number         - Traces using exactly this combination");
        println!("  total_traces: number   - Number of input traces");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Agent Profiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Convert agent tracing data into interactive UpSet plot visualizations.");
}
