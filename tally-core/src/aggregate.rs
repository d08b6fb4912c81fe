//! Aggregation engine: folds records into grand totals and the by-date,
//! by-category and by-correspondent views.
//!
//! Ordering rules:
//! - by_category / by_correspondent: primary-currency volume DESC, ties keep
//!   first-seen order (stable sort over insertion order)
//! - by_date: [`grouping_order`] ASC, i.e. plain string order of the date text

use std::collections::HashMap;

use crate::categorizer::CategoryCache;
use crate::dates::grouping_order;
use crate::record::{
    AnalyticsData, CategorySummary, CorrespondentSummary, DateSummary, Totals, TransactionRecord,
};

/// Insertion-ordered grouping map.
struct Groups<T> {
    index: HashMap<String, usize>,
    items: Vec<T>,
}

impl<T> Groups<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str, make: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.items.push(make());
                self.index.insert(key.to_string(), self.items.len() - 1);
                self.items.len() - 1
            }
        };
        &mut self.items[idx]
    }

    fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// Build the canonical analytics for a full record set.
pub fn aggregate(records: Vec<TransactionRecord>) -> AnalyticsData {
    let categories = classify_all(&records);
    summarize(records, &categories)
}

/// Category label for each record, in record order.
pub(crate) fn classify_all(records: &[TransactionRecord]) -> Vec<&'static str> {
    let mut cache = CategoryCache::new();
    let labels: Vec<_> = records
        .iter()
        .map(|r| cache.classify(&r.description))
        .collect();
    tracing::trace!(
        records = records.len(),
        distinct_descriptions = cache.len(),
        "classified records"
    );
    labels
}

/// Fold `records` into [`AnalyticsData`]. `categories[i]` must be the label of
/// `records[i]`; the result carries no selection.
pub(crate) fn summarize(
    records: Vec<TransactionRecord>,
    categories: &[&'static str],
) -> AnalyticsData {
    debug_assert_eq!(records.len(), categories.len());

    let mut grand = Totals::default();
    let mut by_category: Groups<CategorySummary> = Groups::new();
    let mut by_correspondent: Groups<CorrespondentSummary> = Groups::new();
    let mut by_date: Groups<DateSummary> = Groups::new();

    for (record, &category) in records.iter().zip(categories) {
        grand.add(record);

        let cat = by_category.entry(category, || CategorySummary {
            category: category.to_string(),
            totals: Totals::default(),
            count: 0,
        });
        cat.totals.add(record);
        cat.count += 1;

        let correspondent = record.correspondent_label();
        let corr = by_correspondent.entry(correspondent, || CorrespondentSummary {
            correspondent: correspondent.to_string(),
            totals: Totals::default(),
            count: 0,
        });
        corr.totals.add(record);
        corr.count += 1;

        let day = by_date.entry(&record.date, || DateSummary {
            date: record.date.clone(),
            totals: Totals::default(),
            count: 0,
            by_category: Default::default(),
            by_correspondent: Default::default(),
        });
        day.totals.add(record);
        day.count += 1;
        day.by_category
            .entry(category.to_string())
            .or_default()
            .add(record);
        day.by_correspondent
            .entry(correspondent.to_string())
            .or_default()
            .add(record);
    }

    let mut by_category = by_category.into_vec();
    by_category.sort_by(|a, b| b.totals.volume().total_cmp(&a.totals.volume()));

    let mut by_correspondent = by_correspondent.into_vec();
    by_correspondent.sort_by(|a, b| b.totals.volume().total_cmp(&a.totals.volume()));

    let mut by_date = by_date.into_vec();
    by_date.sort_by(|a, b| grouping_order(&a.date, &b.date));

    tracing::debug!(
        records = records.len(),
        dates = by_date.len(),
        categories = by_category.len(),
        correspondents = by_correspondent.len(),
        "aggregated statement"
    );

    AnalyticsData {
        records,
        total_payments: grand.payments,
        total_receipts: grand.receipts,
        total_payments_alt: grand.payments_alt,
        total_receipts_alt: grand.receipts_alt,
        by_date,
        by_category,
        by_correspondent,
        selected_categories: Default::default(),
        selected_correspondents: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NO_CORRESPONDENT;

    fn scenario() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("01.03.2024", 100.0, 0.0, "Office rent payment", "Acme"),
            TransactionRecord::new("01.03.2024", 0.0, 50.0, "Salary", "Acme"),
        ]
    }

    #[test]
    fn test_rent_and_salary_scenario() {
        let a = aggregate(scenario());

        assert_eq!(a.total_payments, 100.0);
        assert_eq!(a.total_receipts, 50.0);

        assert_eq!(a.by_category.len(), 2);
        assert_eq!(a.by_category[0].category, "Rent");
        assert_eq!(a.by_category[0].totals.payments, 100.0);
        assert_eq!(a.by_category[1].category, "Salary");
        assert_eq!(a.by_category[1].totals.receipts, 50.0);

        assert_eq!(a.by_date.len(), 1);
        let day = &a.by_date[0];
        assert_eq!(day.date, "01.03.2024");
        assert_eq!(day.totals.payments, 100.0);
        assert_eq!(day.totals.receipts, 50.0);
        assert_eq!(day.by_category["Rent"].payments, 100.0);
        assert_eq!(day.by_correspondent["Acme"].receipts, 50.0);

        assert_eq!(a.by_correspondent.len(), 1);
        assert_eq!(a.by_correspondent[0].count, 2);
        assert!(!a.is_filtered());
    }

    #[test]
    fn test_empty_input() {
        let a = aggregate(Vec::new());
        assert_eq!(a.totals(), Totals::default());
        assert!(a.records.is_empty());
        assert!(a.by_date.is_empty());
        assert!(a.by_category.is_empty());
        assert!(a.by_correspondent.is_empty());
    }

    #[test]
    fn test_single_record() {
        let a = aggregate(vec![
            TransactionRecord::new("2024-03-05", 12.5, 0.0, "Bank fee", "Bank").with_alt(6.39, 0.0),
        ]);
        assert_eq!(a.total_payments, 12.5);
        assert_eq!(a.total_payments_alt, 6.39);
        assert_eq!(a.by_category[0].category, "Fees");
        assert_eq!(a.by_category[0].totals.payments_alt, 6.39);
        assert_eq!(a.by_date[0].date, "2024-03-05");
    }

    #[test]
    fn test_blank_correspondent_grouped_under_sentinel() {
        let a = aggregate(vec![
            TransactionRecord::new("01.03.2024", 5.0, 0.0, "ATM", ""),
            TransactionRecord::new("02.03.2024", 7.0, 0.0, "ATM", "  "),
        ]);
        assert_eq!(a.records.len(), 2);
        assert_eq!(a.by_correspondent.len(), 1);
        assert_eq!(a.by_correspondent[0].correspondent, NO_CORRESPONDENT);
        assert_eq!(a.by_correspondent[0].totals.payments, 12.0);
        assert!(a.by_date[1].by_correspondent.contains_key(NO_CORRESPONDENT));
    }

    #[test]
    fn test_volume_desc_with_stable_ties() {
        let a = aggregate(vec![
            TransactionRecord::new("d1", 10.0, 0.0, "Water bill", "A"),
            TransactionRecord::new("d1", 0.0, 10.0, "Salary", "B"),
            TransactionRecord::new("d1", 30.0, 0.0, "Rent", "C"),
        ]);
        let order: Vec<_> = a.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, ["Rent", "Utilities", "Salary"]);

        let order: Vec<_> = a
            .by_correspondent
            .iter()
            .map(|c| c.correspondent.as_str())
            .collect();
        assert_eq!(order, ["C", "A", "B"]);
    }

    #[test]
    fn test_dates_group_by_exact_string_in_string_order() {
        let a = aggregate(vec![
            TransactionRecord::new("02.01.2024", 1.0, 0.0, "x", "A"),
            TransactionRecord::new("2024-01-01", 1.0, 0.0, "x", "A"),
            TransactionRecord::new("01.02.2024", 1.0, 0.0, "x", "A"),
            TransactionRecord::new("01.01.2024", 1.0, 0.0, "x", "A"),
        ]);
        let dates: Vec<_> = a.by_date.iter().map(|d| d.date.as_str()).collect();
        // "01.02.2024" (1 Feb) sorts before "02.01.2024" (2 Jan)
        assert_eq!(dates, ["01.01.2024", "01.02.2024", "02.01.2024", "2024-01-01"]);
    }
}
