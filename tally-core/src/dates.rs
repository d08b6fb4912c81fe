//! Date utilities for statement date strings.
//!
//! Two orderings exist on purpose:
//! - [`grouping_order`]: plain string order, used when the engine sorts `by_date`
//! - [`display_order`]: calendar order, used by table/chart sort toggles
//!
//! They agree only when dates are ISO `yyyy-mm-dd`. For `dd.mm.yyyy` text the
//! grouping order is not chronological.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::record::DateSummary;

/// Render a date the way statements display it: `dd.mm.yyyy`.
pub fn format_display(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Parse `d.m.yyyy`, `yyyy-m-d` or `d/m/yyyy`. Returns `None` for any other
/// shape and for impossible calendar dates.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (day, month, year) = if s.contains('.') {
        let [d, m, y] = split3(s, '.')?;
        (d, m, y)
    } else if s.contains('-') {
        let [y, m, d] = split3(s, '-')?;
        (d, m, y)
    } else if s.contains('/') {
        let [d, m, y] = split3(s, '/')?;
        (d, m, y)
    } else {
        return None;
    };

    let day: u32 = day.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn split3(s: &str, sep: char) -> Option<[&str; 3]> {
    let mut it = s.split(sep);
    let parts = [it.next()?, it.next()?, it.next()?];
    if it.next().is_some() {
        return None;
    }
    Some(parts)
}

/// Ordinal day number (days since 0001-01-01, CE) of a date string, or `None`
/// when the string cannot be parsed.
pub fn parse_to_comparable(s: &str) -> Option<i32> {
    parse_date(s).map(|d| d.num_days_from_ce())
}

/// Calendar comparison of two date strings. If either side is unparseable the
/// dates are reported as equal, which keeps stable sorts stable.
pub fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_to_comparable(a), parse_to_comparable(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Every day from `start` to `end` inclusive, rendered `dd.mm.yyyy`.
/// Empty when either bound is unparseable or `start` is after `end`.
pub fn generate_date_range(start: &str, end: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut current = Some(start);
    while let Some(day) = current {
        if day > end {
            break;
        }
        out.push(format_display(day));
        current = day.succ_opt();
    }
    out
}

/// Ordering used to sort `by_date` groups: string comparison of the date text.
pub fn grouping_order(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Calendar ordering for display. Parseable dates come first in calendar
/// order; unparseable strings follow in string order. Ties on the same day
/// fall back to string order so the result is a total order.
pub fn display_order(a: &str, b: &str) -> Ordering {
    match (parse_to_comparable(a), parse_to_comparable(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Which date ordering a table or chart uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// String order, as the engine emits `by_date`
    #[default]
    Grouping,
    /// Calendar order
    Display,
}

impl SortOrder {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            SortOrder::Grouping => grouping_order(a, b),
            SortOrder::Display => display_order(a, b),
        }
    }
}

/// Re-sort date summaries for presentation.
pub fn sort_date_summaries(days: &mut [DateSummary], order: SortOrder, descending: bool) {
    days.sort_by(|a, b| {
        let ord = order.compare(&a.date, &b.date);
        if descending { ord.reverse() } else { ord }
    });
}
