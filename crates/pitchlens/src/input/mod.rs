//! Input parsing and typed record tables.

mod parser;
mod records;
mod source;

pub use parser::Parser;
pub use records::{
    GoalkeeperRecord, GoalkeeperTable, InvalidCell, PlayerId, PlayerRecord, PlayerTable,
    RecordTable, TableRecord,
};
pub use source::{DataTable, SourceMetadata};
