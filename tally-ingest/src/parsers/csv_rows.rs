//! CSV statement reader.
//!
//! Same column layout as the workbook export, saved as CSV. Banks emit both
//! `,` and `;` separated files; the separator is sniffed from the first
//! non-empty line. All fields arrive as text and are typed during
//! normalization.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::types::{Cell, RawRow};

/// Read a CSV statement into raw rows.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_csv_text(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Parse CSV text (BOM tolerated) into raw rows.
pub fn parse_csv_text(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = sniff_delimiter(text);

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::text(field)
                    }
                })
                .collect(),
        );
    }

    tracing::debug!(rows = rows.len(), delimiter = %(delimiter as char), "read csv");
    Ok(rows)
}

fn sniff_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semis = first.matches(';').count();
    let commas = first.matches(',').count();
    if semis > commas { b';' } else { b',' }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_comma_rows() {
        let text = "Statement,,\nDate,Time,Payments\n01.03.2024,10:15,\"1,234.50\"\n";
        let rows = parse_csv_text(text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][0], Cell::text("01.03.2024"));
        assert_eq!(rows[2][2], Cell::text("1,234.50"));
    }

    #[test]
    fn test_sniffs_semicolons_and_strips_bom() {
        let text = "\u{feff}Date;Time;Payments;Payments alt\n01.03.2024;;12,50;6,39\n";
        let rows = parse_csv_text(text).unwrap();
        assert_eq!(rows[0][0], Cell::text("Date"));
        assert_eq!(rows[1][1], Cell::Empty);
        assert_eq!(rows[1][2], Cell::text("12,50"));
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let rows = parse_csv_text("a,b,c\nd\n").unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
    }
}
