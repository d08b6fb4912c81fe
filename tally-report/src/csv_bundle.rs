//! CSV export: one file per sheet of the statement workbook
//! (records, totals, by date, by category, by correspondent).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::{AnalyticsData, classify};

use crate::{Labels, money};

pub const RECORDS_FILE: &str = "records.csv";
pub const TOTALS_FILE: &str = "totals.csv";
pub const BY_DATE_FILE: &str = "by_date.csv";
pub const BY_CATEGORY_FILE: &str = "by_category.csv";
pub const BY_CORRESPONDENT_FILE: &str = "by_correspondent.csv";

/// Write every sheet into `dir` (created if missing). Returns the files
/// written, in sheet order.
pub fn write_csv_bundle(
    data: &AnalyticsData,
    dir: impl AsRef<Path>,
    labels: &Labels,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let written = vec![
        write_records(data, &dir.join(RECORDS_FILE), labels)?,
        write_totals(data, &dir.join(TOTALS_FILE), labels)?,
        write_by_date(data, &dir.join(BY_DATE_FILE), labels)?,
        write_by_category(data, &dir.join(BY_CATEGORY_FILE), labels)?,
        write_by_correspondent(data, &dir.join(BY_CORRESPONDENT_FILE), labels)?,
    ];

    tracing::info!(dir = %dir.display(), files = written.len(), "wrote csv export");
    Ok(written)
}

fn writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))
}

fn amount_header(first: &str, labels: &Labels) -> [String; 5] {
    [
        first.to_string(),
        format!("Payments ({})", labels.primary),
        format!("Receipts ({})", labels.primary),
        format!("Payments ({})", labels.alt),
        format!("Receipts ({})", labels.alt),
    ]
}

fn write_records(data: &AnalyticsData, path: &Path, labels: &Labels) -> Result<PathBuf> {
    let mut w = writer(path)?;
    w.write_record([
        "Date".to_string(),
        "Time".to_string(),
        format!("Payments ({})", labels.primary),
        format!("Payments ({})", labels.alt),
        format!("Receipts ({})", labels.primary),
        format!("Receipts ({})", labels.alt),
        "Description".to_string(),
        "Correspondent".to_string(),
        "Category".to_string(),
        "Payment basis".to_string(),
        "Reference".to_string(),
    ])?;
    for r in &data.records {
        w.write_record([
            r.date.clone(),
            r.time.clone(),
            money(r.payments),
            money(r.payments_alt),
            money(r.receipts),
            money(r.receipts_alt),
            r.description.clone(),
            r.correspondent.clone(),
            classify(&r.description).to_string(),
            r.payment_basis.clone(),
            r.reference.clone(),
        ])?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

fn write_totals(data: &AnalyticsData, path: &Path, labels: &Labels) -> Result<PathBuf> {
    let mut w = writer(path)?;
    w.write_record(["Metric", "Value"])?;
    w.write_record([
        format!("Total payments ({})", labels.primary),
        money(data.total_payments),
    ])?;
    w.write_record([format!("Total payments ({})", labels.alt), money(data.total_payments_alt)])?;
    w.write_record([
        format!("Total receipts ({})", labels.primary),
        money(data.total_receipts),
    ])?;
    w.write_record([format!("Total receipts ({})", labels.alt), money(data.total_receipts_alt)])?;
    if !data.selected_categories.is_empty() {
        let joined: Vec<_> = data.selected_categories.iter().map(String::as_str).collect();
        w.write_record(["Selected categories".to_string(), joined.join("; ")])?;
    }
    if !data.selected_correspondents.is_empty() {
        let joined: Vec<_> = data.selected_correspondents.iter().map(String::as_str).collect();
        w.write_record(["Selected correspondents".to_string(), joined.join("; ")])?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

fn write_by_date(data: &AnalyticsData, path: &Path, labels: &Labels) -> Result<PathBuf> {
    let mut w = writer(path)?;
    w.write_record(amount_header("Date", labels))?;
    for d in &data.by_date {
        w.write_record([
            d.date.clone(),
            money(d.totals.payments),
            money(d.totals.receipts),
            money(d.totals.payments_alt),
            money(d.totals.receipts_alt),
        ])?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

fn write_by_category(data: &AnalyticsData, path: &Path, labels: &Labels) -> Result<PathBuf> {
    let mut w = writer(path)?;
    w.write_record(amount_header("Category", labels))?;
    for c in &data.by_category {
        w.write_record([
            c.category.clone(),
            money(c.totals.payments),
            money(c.totals.receipts),
            money(c.totals.payments_alt),
            money(c.totals.receipts_alt),
        ])?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

fn write_by_correspondent(data: &AnalyticsData, path: &Path, labels: &Labels) -> Result<PathBuf> {
    let mut w = writer(path)?;
    w.write_record(amount_header("Correspondent", labels))?;
    for c in &data.by_correspondent {
        w.write_record([
            c.correspondent.clone(),
            money(c.totals.payments),
            money(c.totals.receipts),
            money(c.totals.payments_alt),
            money(c.totals.receipts_alt),
        ])?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{TransactionRecord, aggregate};

    #[test]
    fn test_writes_five_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let data = aggregate(vec![
            TransactionRecord::new("01.03.2024", 100.0, 0.0, "Office rent payment", "Acme"),
            TransactionRecord::new("01.03.2024", 0.0, 50.0, "Salary", ""),
        ]);

        let files = write_csv_bundle(&data, dir.path().join("out"), &Labels::default()).unwrap();
        assert_eq!(files.len(), 5);
        for f in &files {
            assert!(f.exists(), "{} missing", f.display());
        }

        let by_cat = fs::read_to_string(dir.path().join("out").join(BY_CATEGORY_FILE)).unwrap();
        let lines: Vec<_> = by_cat.lines().collect();
        assert_eq!(
            lines[0],
            "Category,Payments (BGN),Receipts (BGN),Payments (EUR),Receipts (EUR)"
        );
        assert_eq!(lines[1], "Rent,100.00,0.00,0.00,0.00");
        assert_eq!(lines[2], "Salary,0.00,50.00,0.00,0.00");

        let records = fs::read_to_string(dir.path().join("out").join(RECORDS_FILE)).unwrap();
        assert!(records.lines().nth(1).unwrap().contains(",Rent,"));

        let corr = fs::read_to_string(dir.path().join("out").join(BY_CORRESPONDENT_FILE)).unwrap();
        assert!(corr.contains("No correspondent,0.00,50.00"));
    }
}
