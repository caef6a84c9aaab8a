//! CSV export of analysis results.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analyzer::AnalysisResult;
use crate::error::{PitchlensError, Result};

/// File name offered for downloads.
pub const DEFAULT_EXPORT_FILE: &str = "performance_analysis.csv";

/// Column headers of the export.
pub const EXPORT_HEADERS: [&str; 2] = ["Player ID", "Analysis"];

/// Write results as CSV with a `Player ID,Analysis` header.
///
/// The header is written even when there are no results.
pub fn write_csv<W: Write>(results: &[AnalysisResult], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(EXPORT_HEADERS)?;
    for result in results {
        writer.write_record([result.player_id.as_str(), result.text()])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render results as a CSV string.
pub fn to_csv_string(results: &[AnalysisResult]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(results, &mut buf)?;
    // Every field is a &str, so the buffer is UTF-8
    Ok(String::from_utf8(buf)?)
}

/// Save results to a CSV file, creating parent directories as needed.
pub fn save_csv(results: &[AnalysisResult], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PitchlensError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let file = File::create(path).map_err(|e| PitchlensError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_csv(results, BufWriter::new(file))
}
