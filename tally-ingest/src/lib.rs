//! tally-ingest: statement file readers and row normalization into
//! `tally_core::TransactionRecord`.

pub mod normalize;
pub mod parsers;
pub mod types;

pub use normalize::{normalize_rows, parse_amount};
pub use parsers::{load_statement, read_rows};
pub use types::{Cell, DateStyle, IngestOptions, RawRow, StatementFormat};
