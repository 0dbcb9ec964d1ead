//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur during trace parsing and normalization
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unsupported input type: {0}")]
    UnsupportedInput(String),

    #[error("Invalid JSON string or file not found: {0}")]
    InvalidDocument(String),

    #[error("Trace entry must be a JSON object, found {0}")]
    InvalidRecord(String),

    #[error("Failed to read trace file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to serialize plot data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
