//! Spreadsheet statement reader (xls / xlsx / xlsb / ods).
//!
//! Expected first-sheet layout:
//!   row 1   title ("Account statement ...")
//!   row 2   column headings
//!   row 3+  Date | Time | Payments | Payments (alt) | Receipts | Receipts (alt) |
//!           Description | Correspondent | Balance | Balance (alt) | Basis |
//!           Notes | Reference | Debit advice

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

use crate::types::{Cell, RawRow};

/// Read the first worksheet into raw rows, anchored at A1.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening {}", path.display()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("no worksheets in {}", path.display()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{}' of {}", sheet, path.display()))?;

    let rows = range_to_rows(&range);
    tracing::debug!(sheet = %sheet, rows = rows.len(), "read worksheet");
    Ok(rows)
}

/// calamine ranges start at the first used cell; pad so column indexes match
/// the sheet's own columns.
fn range_to_rows(range: &Range<Data>) -> Vec<RawRow> {
    let (first_row, first_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<RawRow> = (0..first_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; first_col];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }
    rows
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        _ => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(45352.5)), Cell::Number(45352.5));
        assert_eq!(
            cell_from_data(&Data::String("Office rent".into())),
            Cell::text("Office rent")
        );
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::text("true"));
    }

    #[test]
    fn test_range_padding_keeps_columns_aligned() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("title".into()));
        range.set_value((2, 3), Data::Float(1.5));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1][2], Cell::text("title"));
        assert_eq!(rows[2][3], Cell::Number(1.5));
        assert_eq!(rows[2][0], Cell::Empty);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_workbook("/definitely/not/here.xlsx").unwrap_err();
        assert!(err.to_string().contains("opening"));
    }
}
