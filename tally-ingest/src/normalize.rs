//! Turn raw statement rows into `TransactionRecord`s.
//!
//! Row rules:
//! - the first `header_rows` rows are headings
//! - rows with a blank date cell are skipped
//! - rows with neither description nor correspondent are dropped
//! - unreadable numbers become 0; amounts are stored as absolute values

use chrono::{NaiveDate, TimeDelta};
use regex::Regex;
use std::sync::OnceLock;

use tally_core::{TransactionRecord, format_display, parse_date};

use crate::types::{Cell, DateStyle, IngestOptions, RawRow, columns};

fn non_numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9,.\-]").expect("invalid amount regex"))
}

/// Normalize every data row. Never fails: bad cells degrade to defaults.
pub fn normalize_rows<I>(rows: I, opts: &IngestOptions) -> Vec<TransactionRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut out = Vec::new();
    let mut dropped = 0usize;

    for (idx, row) in rows.into_iter().enumerate().skip(opts.header_rows) {
        if row.first().is_none_or(Cell::is_blank) {
            continue;
        }
        match normalize_row(&row, idx, opts) {
            Some(record) => out.push(record),
            None => dropped += 1,
        }
    }

    tracing::debug!(kept = out.len(), dropped, "normalized statement rows");
    out
}

fn normalize_row(row: &[Cell], idx: usize, opts: &IngestOptions) -> Option<TransactionRecord> {
    let description = text_at(row, columns::DESCRIPTION);
    let correspondent = text_at(row, columns::CORRESPONDENT);
    if description.is_empty() && correspondent.is_empty() {
        tracing::debug!(row = idx + 1, "dropping row without description or correspondent");
        return None;
    }

    let amount = |col: usize| amount_at(row, col, idx);

    Some(TransactionRecord {
        date: date_at(row, columns::DATE, opts.date_style),
        time: time_at(row, columns::TIME),
        payments: amount(columns::PAYMENTS).abs(),
        payments_alt: amount(columns::PAYMENTS_ALT).abs(),
        receipts: amount(columns::RECEIPTS).abs(),
        receipts_alt: amount(columns::RECEIPTS_ALT).abs(),
        description,
        correspondent,
        interim_balance: amount(columns::INTERIM_BALANCE),
        interim_balance_alt: amount(columns::INTERIM_BALANCE_ALT),
        payment_basis: text_at(row, columns::PAYMENT_BASIS),
        notes: text_at(row, columns::NOTES),
        reference: text_at(row, columns::REFERENCE),
        debit_advice: text_at(row, columns::DEBIT_ADVICE),
    })
}

fn text_at(row: &[Cell], col: usize) -> String {
    match row.get(col) {
        Some(Cell::Text(s)) => s.trim().to_string(),
        Some(Cell::Number(n)) => number_to_text(*n),
        Some(Cell::Empty) | None => String::new(),
    }
}

fn number_to_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn amount_at(row: &[Cell], col: usize, idx: usize) -> f64 {
    match row.get(col) {
        Some(Cell::Number(n)) if n.is_finite() => *n,
        Some(Cell::Text(s)) if !s.trim().is_empty() => parse_amount(s).unwrap_or_else(|| {
            tracing::warn!(row = idx + 1, column = col, value = %s, "unreadable amount, using 0");
            0.0
        }),
        _ => 0.0,
    }
}

/// Parse an amount written as text: `1 234,56`, `1,234.56`, `-15.00 BGN`.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned = non_numeric_re().replace_all(s.trim(), "");
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // both present: the later one is the decimal separator
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned.into_owned(),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Spreadsheet serial day 0.
fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Date for a spreadsheet serial number (fractional part ignored). `None`
/// when the serial falls outside chrono's date range.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = TimeDelta::try_days(serial.floor() as i64)?;
    serial_epoch()?.checked_add_signed(days)
}

/// `HH:MM:SS` for the fractional day part of a spreadsheet serial.
pub fn serial_to_time(serial: f64) -> String {
    let total = (serial.fract().abs() * 86_400.0).round() as u32 % 86_400;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

fn render_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::DayMonthYear => format_display(date),
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
    }
}

fn date_at(row: &[Cell], col: usize, style: DateStyle) -> String {
    match row.get(col) {
        Some(Cell::Number(n)) => match serial_to_date(*n) {
            Some(d) => render_date(d, style),
            None => number_to_text(*n),
        },
        Some(Cell::Text(s)) => {
            let s = s.trim();
            match parse_date(s) {
                Some(d) => render_date(d, style),
                None => s.to_string(),
            }
        }
        Some(Cell::Empty) | None => String::new(),
    }
}

fn time_at(row: &[Cell], col: usize) -> String {
    match row.get(col) {
        Some(Cell::Number(n)) => serial_to_time(*n),
        Some(Cell::Text(s)) => s.trim().to_string(),
        Some(Cell::Empty) | None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading_rows() -> Vec<RawRow> {
        vec![
            vec![Cell::text("Account statement")],
            vec![Cell::text("Date"), Cell::text("Time"), Cell::text("Payments")],
        ]
    }

    fn row(date: Cell, payments: Cell, receipts: Cell, desc: &str, corr: &str) -> RawRow {
        vec![
            date,
            Cell::Number(0.5),
            payments,
            Cell::Empty,
            receipts,
            Cell::Empty,
            Cell::text(desc),
            Cell::text(corr),
            Cell::Number(1000.0),
        ]
    }

    #[test]
    fn test_skips_headings_and_blank_dates() {
        let mut rows = heading_rows();
        rows.push(row(Cell::Number(45352.0), Cell::Number(100.0), Cell::Empty, "Office rent", "Acme"));
        rows.push(row(Cell::Empty, Cell::Number(1.0), Cell::Empty, "ghost", "ghost"));

        let records = normalize_rows(rows, &IngestOptions::default());
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date, "01.03.2024");
        assert_eq!(r.time, "12:00:00");
        assert_eq!(r.payments, 100.0);
        assert_eq!(r.receipts, 0.0);
        assert_eq!(r.interim_balance, 1000.0);
        assert_eq!(r.notes, "");
    }

    #[test]
    fn test_drops_rows_without_description_and_correspondent() {
        let mut rows = heading_rows();
        rows.push(row(Cell::text("01.03.2024"), Cell::Number(5.0), Cell::Empty, "", " "));
        rows.push(row(Cell::text("01.03.2024"), Cell::Number(5.0), Cell::Empty, "ATM", ""));
        rows.push(row(Cell::text("01.03.2024"), Cell::Number(5.0), Cell::Empty, "", "Acme"));

        let records = normalize_rows(rows, &IngestOptions::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].correspondent, "");
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn test_iso_date_style() {
        let opts = IngestOptions {
            header_rows: 0,
            date_style: DateStyle::Iso,
        };
        let rows = vec![
            row(Cell::Number(45352.75), Cell::Empty, Cell::Number(3.0), "Salary", "Globex"),
            row(Cell::text("5.3.2024"), Cell::Empty, Cell::Number(3.0), "Salary", "Globex"),
            row(Cell::text("sometime"), Cell::Empty, Cell::Number(3.0), "Salary", "Globex"),
        ];
        let records = normalize_rows(rows, &opts);
        assert_eq!(records[0].date, "2024-03-01");
        assert_eq!(records[1].date, "2024-03-05");
        assert_eq!(records[2].date, "sometime");
    }

    #[test]
    fn test_text_amounts_and_negatives() {
        let mut rows = heading_rows();
        rows.push(row(
            Cell::text("02.03.2024"),
            Cell::text("1 234,50"),
            Cell::text("-15.00 BGN"),
            "Invoice",
            "Shop",
        ));
        rows.push(row(Cell::text("02.03.2024"), Cell::text("n/a"), Cell::Empty, "Invoice", "Shop"));

        let records = normalize_rows(rows, &IngestOptions::default());
        assert_eq!(records[0].payments, 1234.5);
        assert_eq!(records[0].receipts, 15.0);
        assert_eq!(records[1].payments, 0.0);
    }

    #[test]
    fn test_parse_amount_separators() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("\u{a0}7\u{a0}000"), Some(7000.0));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_numeric_text_columns() {
        let mut r = row(Cell::text("01.03.2024"), Cell::Empty, Cell::Empty, "Fee", "Bank");
        r.extend([Cell::Empty, Cell::Empty, Cell::Empty, Cell::Number(884512.0)]);
        let records = normalize_rows(vec![r], &IngestOptions { header_rows: 0, ..Default::default() });
        assert_eq!(records[0].reference, "884512");
    }

    #[test]
    fn test_out_of_range_serial_date_kept_as_text() {
        assert_eq!(serial_to_date(1e15), None);
        assert_eq!(serial_to_date(f64::MAX), None);
        assert_eq!(serial_to_date(-1e15), None);

        let rows = vec![row(Cell::Number(1e15), Cell::Number(5.0), Cell::Empty, "Fee", "Bank")];
        let records = normalize_rows(rows, &IngestOptions { header_rows: 0, ..Default::default() });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "1000000000000000");
        assert_eq!(records[0].payments, 5.0);
    }

    #[test]
    fn test_serial_time() {
        assert_eq!(serial_to_time(0.0), "00:00:00");
        assert_eq!(serial_to_time(0.25), "06:00:00");
        assert_eq!(serial_to_time(45352.5), "12:00:00");
    }
}
