//! CSV parser for uploaded roster files.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata};
use crate::error::{PitchlensError, Result};

/// Parser configuration.
#[derive(Debug, Clone)]
struct ParserConfig {
    delimiter: u8,
    quote: u8,
    /// Trim surrounding whitespace from headers and fields.
    trim: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: true,
        }
    }
}

/// Parses CSV uploads into [`DataTable`]s.
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Parse a file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| PitchlensError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let label = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.parse_bytes(label, &contents)
    }

    /// Parse uploaded bytes, labelling the result for display.
    pub fn parse_bytes(
        &self,
        label: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(DataTable, SourceMetadata)> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.read_table(bytes)?;
        let metadata = SourceMetadata::new(
            label,
            hash,
            bytes.len() as u64,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    fn read_table(&self, bytes: &[u8]) -> Result<DataTable> {
        let trim = if self.config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .trim(trim)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(PitchlensError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Blank lines come through as a single empty field
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }

            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
