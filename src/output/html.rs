//! HTML chart output writer.
//!
//! Writes rendered UpSet plot documents to files.

use super::json::{create_parent_dirs, validate_output_path};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write HTML content to a file
///
/// **Public** - main entry point for HTML output
///
/// # Arguments
/// * `html_content` - Rendered document from the plot generator
/// * `output_path` - Path to output HTML file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_html(html_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing HTML to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(ext) = output_path.extension() {
        if ext != "html" && ext != "htm" {
            debug!(
                "File does not have an .html extension: {}",
                output_path.display()
            );
        }
    }

    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(html_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "HTML written successfully ({} bytes, {:.2} KB)",
        html_content.len(),
        html_content.len() as f64 / 1024.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const VALID_HTML: &str = "<!DOCTYPE html>\n<html><body><div id=\"upset\"></div></body></html>";

    #[test]
    fn test_write_html() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_html(VALID_HTML, path).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, VALID_HTML);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/plot.html");

        write_html(VALID_HTML, &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_write_html_directory_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_html(VALID_HTML, temp_dir.path());
        assert!(result.is_err());
    }
}
