//! Plain-text summary tables: totals, by date, by category, by correspondent.
//! Amounts print with two decimals; nothing is recomputed here.

use std::fmt::Write as _;

use tally_core::{AnalyticsData, SortOrder, sort_date_summaries};

use crate::{Labels, money};

/// Presentation knobs for [`render_summary`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Date ordering for the by-date table
    pub date_order: SortOrder,
    pub descending: bool,
    /// Cap on rows per category/correspondent table
    pub top: Option<usize>,
}

/// Fixed-width text table; the first column is left-aligned, the rest right.
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render(&self, out: &mut String) {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|i| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .chain(std::iter::once(&self.headers[i]))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String], out: &mut String| {
            let mut parts = Vec::with_capacity(cells.len());
            for (i, cell) in cells.iter().enumerate() {
                let w = widths.get(i).copied().unwrap_or(0);
                if i == 0 {
                    parts.push(format!("{cell:<w$}"));
                } else {
                    parts.push(format!("{cell:>w$}"));
                }
            }
            let _ = writeln!(out, "{}", parts.join("  ").trim_end());
        };

        line(&self.headers, out);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("  "));
        for row in &self.rows {
            line(row, out);
        }
    }
}

fn amount_headers(first: &str, labels: &Labels) -> Vec<String> {
    vec![
        first.to_string(),
        format!("Payments ({})", labels.primary),
        format!("Receipts ({})", labels.primary),
        format!("Payments ({})", labels.alt),
        format!("Receipts ({})", labels.alt),
    ]
}

/// Render the four summary tables as text.
pub fn render_summary(data: &AnalyticsData, labels: &Labels, opts: &RenderOptions) -> String {
    let mut out = String::new();

    if data.is_filtered() {
        let _ = writeln!(out, "Filter");
        if !data.selected_categories.is_empty() {
            let cats: Vec<_> = data.selected_categories.iter().map(String::as_str).collect();
            let _ = writeln!(out, "  categories:     {}", cats.join(", "));
        }
        if !data.selected_correspondents.is_empty() {
            let corrs: Vec<_> = data.selected_correspondents.iter().map(String::as_str).collect();
            let _ = writeln!(out, "  correspondents: {}", corrs.join(", "));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Totals ({} records)", data.records.len());
    let mut totals = Table::new(vec![
        "Metric".to_string(),
        labels.primary.clone(),
        labels.alt.clone(),
    ]);
    totals.push(vec![
        "Payments".to_string(),
        money(data.total_payments),
        money(data.total_payments_alt),
    ]);
    totals.push(vec![
        "Receipts".to_string(),
        money(data.total_receipts),
        money(data.total_receipts_alt),
    ]);
    let grand = data.totals();
    totals.push(vec![
        "Net".to_string(),
        money(grand.net()),
        money(grand.net_alt()),
    ]);
    totals.render(&mut out);

    let _ = writeln!(out, "\nBy date");
    let mut days = data.by_date.clone();
    sort_date_summaries(&mut days, opts.date_order, opts.descending);
    // one net column per selected label, read from the per-date breakdowns
    let mut headers = amount_headers("Date", labels);
    headers.extend(data.selected_categories.iter().map(|c| format!("{c} net")));
    headers.extend(data.selected_correspondents.iter().map(|c| format!("{c} net")));
    let mut by_date = Table::new(headers);
    for d in &days {
        let mut row = vec![
            d.date.clone(),
            money(d.totals.payments),
            money(d.totals.receipts),
            money(d.totals.payments_alt),
            money(d.totals.receipts_alt),
        ];
        for c in &data.selected_categories {
            row.push(money(d.by_category.get(c).copied().unwrap_or_default().net()));
        }
        for c in &data.selected_correspondents {
            row.push(money(d.by_correspondent.get(c).copied().unwrap_or_default().net()));
        }
        by_date.push(row);
    }
    by_date.render(&mut out);

    let limit = opts.top.unwrap_or(usize::MAX);

    let _ = writeln!(out, "\nBy category");
    let mut by_cat = Table::new(amount_headers("Category", labels));
    for c in data.by_category.iter().take(limit) {
        by_cat.push(vec![
            c.category.clone(),
            money(c.totals.payments),
            money(c.totals.receipts),
            money(c.totals.payments_alt),
            money(c.totals.receipts_alt),
        ]);
    }
    by_cat.render(&mut out);

    let _ = writeln!(out, "\nBy correspondent");
    let mut by_corr = Table::new(amount_headers("Correspondent", labels));
    for c in data.by_correspondent.iter().take(limit) {
        by_corr.push(vec![
            c.correspondent.clone(),
            money(c.totals.payments),
            money(c.totals.receipts),
            money(c.totals.payments_alt),
            money(c.totals.receipts_alt),
        ]);
    }
    by_corr.render(&mut out);

    out
}
