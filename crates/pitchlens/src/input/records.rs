//! Typed player and goalkeeper tables built from parsed CSV data.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::source::DataTable;
use crate::error::{PitchlensError, Result};

/// Identifier of a player or goalkeeper row.
///
/// Stored as the trimmed cell text, so `7` in one file equals `7` in another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<i64> for PlayerId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// A metric cell that could not be read as its column's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCell {
    /// 1-based line number, counting the header line.
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl From<InvalidCell> for PitchlensError {
    fn from(cell: InvalidCell) -> Self {
        PitchlensError::InvalidValue {
            row: cell.row,
            column: cell.column,
            value: cell.value,
        }
    }
}

/// A row type that can be read out of a [`DataTable`].
pub trait TableRecord: Sized {
    /// Human-readable table kind, used in error messages.
    const KIND: &'static str;

    /// Columns that must be present, in the order passed to `from_row`.
    const COLUMNS: &'static [&'static str];

    /// Build a record from the cells of `COLUMNS`.
    ///
    /// Blank metric cells become `None`.
    fn from_row(cells: &[&str], row: usize) -> std::result::Result<Self, InvalidCell>;

    fn player_id(&self) -> &PlayerId;
}

/// Per-game metrics of an outfield player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub average_speed_over_a_game: Option<f64>,
    pub no_of_goals_made: Option<i64>,
    pub fouls: Option<i64>,
    pub yellow_card: Option<i64>,
    pub red_card: Option<i64>,
}

impl TableRecord for PlayerRecord {
    const KIND: &'static str = "player";
    const COLUMNS: &'static [&'static str] = &[
        "player_id",
        "average_speed_over_a_game",
        "no_of_goals_made",
        "fouls",
        "yellow_card",
        "red_card",
    ];

    fn from_row(cells: &[&str], row: usize) -> std::result::Result<Self, InvalidCell> {
        Ok(Self {
            player_id: PlayerId::new(cells[0]),
            average_speed_over_a_game: parse_float(cells[1], Self::COLUMNS[1], row)?,
            no_of_goals_made: parse_count(cells[2], Self::COLUMNS[2], row)?,
            fouls: parse_count(cells[3], Self::COLUMNS[3], row)?,
            yellow_card: parse_count(cells[4], Self::COLUMNS[4], row)?,
            red_card: parse_count(cells[5], Self::COLUMNS[5], row)?,
        })
    }

    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }
}

/// Per-game metrics of a goalkeeper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalkeeperRecord {
    pub player_id: PlayerId,
    pub no_of_goals_save: Option<i64>,
}

impl TableRecord for GoalkeeperRecord {
    const KIND: &'static str = "goalkeeper";
    const COLUMNS: &'static [&'static str] = &["player_id", "no_of_goals_save"];

    fn from_row(cells: &[&str], row: usize) -> std::result::Result<Self, InvalidCell> {
        Ok(Self {
            player_id: PlayerId::new(cells[0]),
            no_of_goals_save: parse_count(cells[1], Self::COLUMNS[1], row)?,
        })
    }

    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }
}

#[derive(Debug, Clone)]
struct TableRow<R> {
    id: PlayerId,
    record: std::result::Result<R, InvalidCell>,
}

/// An immutable, ordered table of records loaded from one upload.
///
/// Rows with unreadable metric cells keep their identifier and only fail
/// when they are looked up.
#[derive(Debug, Clone)]
pub struct RecordTable<R> {
    label: String,
    rows: Vec<TableRow<R>>,
}

pub type PlayerTable = RecordTable<PlayerRecord>;
pub type GoalkeeperTable = RecordTable<GoalkeeperRecord>;

impl<R: TableRecord> RecordTable<R> {
    /// Build a typed table, failing only when a required column is missing.
    pub fn from_data(label: impl Into<String>, table: &DataTable) -> Result<Self> {
        let label = label.into();
        let indices = R::COLUMNS
            .iter()
            .map(|&column| {
                table
                    .column_index(column)
                    .ok_or_else(|| PitchlensError::MissingColumn {
                        table: R::KIND.to_string(),
                        column: column.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let rows: Vec<TableRow<R>> = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let cells: Vec<&str> = indices
                    .iter()
                    .map(|&i| row.get(i).map(|s| s.as_str()).unwrap_or(""))
                    .collect();
                TableRow {
                    id: PlayerId::new(cells[0]),
                    // 1-based, counting the header line
                    record: R::from_row(&cells, row_idx + 2),
                }
            })
            .collect();

        for cell in rows.iter().filter_map(|r| r.record.as_ref().err()) {
            log::warn!(
                "{}: unreadable {} value '{}' at row {}",
                label,
                cell.column,
                cell.value,
                cell.row
            );
        }

        Ok(Self { label, rows })
    }

    /// Build a table from records already in memory.
    pub fn from_records(label: impl Into<String>, records: Vec<R>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| TableRow {
                id: record.player_id().clone(),
                record: Ok(record),
            })
            .collect();

        Self {
            label: label.into(),
            rows,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Readable records in table order.
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().filter_map(|r| r.record.as_ref().ok())
    }

    /// Cells that could not be read, one per unreadable row.
    pub fn invalid_cells(&self) -> impl Iterator<Item = &InvalidCell> {
        self.rows.iter().filter_map(|r| r.record.as_ref().err())
    }

    /// Number of rows, readable or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Identifiers in table order, duplicates included.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.rows.iter().map(|r| &r.id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.ids().any(|i| i == id)
    }

    /// First row whose identifier equals `id`.
    ///
    /// Returns `Some(Err(InvalidValue))` when that row has an unreadable cell.
    pub fn find(&self, id: &PlayerId) -> Option<Result<&R>> {
        self.rows
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.record.as_ref().map_err(|cell| cell.clone().into()))
    }
}

fn parse_float(
    value: &str,
    column: &str,
    row: usize,
) -> std::result::Result<Option<f64>, InvalidCell> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| invalid(value, column, row))
}

/// Counts may arrive as `2` or, from spreadsheet exports, `2.0`.
fn parse_count(
    value: &str,
    column: &str,
    row: usize,
) -> std::result::Result<Option<i64>, InvalidCell> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Some(n));
    }
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(invalid(value, column, row)),
    }
}

fn invalid(value: &str, column: &str, row: usize) -> InvalidCell {
    InvalidCell {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}
