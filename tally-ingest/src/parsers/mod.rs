//! Statement file front-ends. Each produces `RawRow`s; normalization is shared.

pub mod csv_rows;
pub mod workbook;

use anyhow::{Result, bail};
use std::path::Path;

use tally_core::TransactionRecord;

use crate::normalize::normalize_rows;
use crate::types::{IngestOptions, RawRow, StatementFormat};

impl StatementFormat {
    /// Pick a reader from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(StatementFormat::Workbook),
            "csv" | "txt" => Some(StatementFormat::Csv),
            _ => None,
        }
    }
}

/// Read the raw rows of a statement file.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    match StatementFormat::from_path(path) {
        Some(StatementFormat::Workbook) => workbook::read_workbook(path),
        Some(StatementFormat::Csv) => csv_rows::read_csv(path),
        None => bail!(
            "unsupported statement file: {} (expected .xls, .xlsx, .ods or .csv)",
            path.display()
        ),
    }
}

/// Read and normalize a statement file into records ready for aggregation.
pub fn load_statement(
    path: impl AsRef<Path>,
    opts: &IngestOptions,
) -> Result<Vec<TransactionRecord>> {
    let path = path.as_ref();
    let rows = read_rows(path)?;
    let records = normalize_rows(rows, opts);
    tracing::info!(records = records.len(), file = %path.display(), "loaded statement");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        let f = |p: &str| StatementFormat::from_path(&PathBuf::from(p));
        assert_eq!(f("march.XLSX"), Some(StatementFormat::Workbook));
        assert_eq!(f("march.xls"), Some(StatementFormat::Workbook));
        assert_eq!(f("march.csv"), Some(StatementFormat::Csv));
        assert_eq!(f("march.pdf"), None);
        assert_eq!(f("march"), None);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = read_rows("statement.pdf").unwrap_err();
        assert!(err.to_string().contains("unsupported statement file"));
    }
}
