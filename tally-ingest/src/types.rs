use serde::{Deserialize, Serialize};

/// One spreadsheet cell as the file front-ends hand it over.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// Numeric cell; dates and times arrive as spreadsheet serials
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

/// Ordered field tuple for one statement row.
pub type RawRow = Vec<Cell>;

/// Column positions in the statement export.
pub mod columns {
    pub const DATE: usize = 0;
    pub const TIME: usize = 1;
    pub const PAYMENTS: usize = 2;
    pub const PAYMENTS_ALT: usize = 3;
    pub const RECEIPTS: usize = 4;
    pub const RECEIPTS_ALT: usize = 5;
    pub const DESCRIPTION: usize = 6;
    pub const CORRESPONDENT: usize = 7;
    pub const INTERIM_BALANCE: usize = 8;
    pub const INTERIM_BALANCE_ALT: usize = 9;
    pub const PAYMENT_BASIS: usize = 10;
    pub const NOTES: usize = 11;
    pub const REFERENCE: usize = 12;
    pub const DEBIT_ADVICE: usize = 13;
}

/// How normalized dates are written onto records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateStyle {
    /// `dd.mm.yyyy`, as the bank displays it
    #[default]
    DayMonthYear,
    /// `yyyy-mm-dd`; string order equals calendar order
    Iso,
}

/// Row normalization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Leading rows to skip (title line + column headings)
    pub header_rows: usize,
    pub date_style: DateStyle,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            header_rows: 2,
            date_style: DateStyle::DayMonthYear,
        }
    }
}

/// Statement file kinds we can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    /// xls / xlsx / xlsb / ods, read through calamine
    Workbook,
    Csv,
}
