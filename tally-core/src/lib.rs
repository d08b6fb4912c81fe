//! tally-core: statement analytics: categorization, aggregation, filtering
//! and date ordering over in-memory transaction records.
//!
//! Everything here is a pure, synchronous transform. Ingestion and export
//! live in `tally-ingest` and `tally-report`.

pub mod aggregate;
pub mod categorizer;
pub mod dates;
pub mod filter;
pub mod record;

pub use aggregate::aggregate;
pub use categorizer::{
    CATEGORY_RULES, CategoryCache, CategoryRule, OTHER, UNCATEGORIZED, category_labels, classify,
};
pub use dates::{
    SortOrder, compare_dates, display_order, format_display, generate_date_range, grouping_order,
    parse_date, parse_to_comparable, sort_date_summaries,
};
pub use filter::{FilterSession, apply_filter};
pub use record::{
    AnalyticsData, CategorySummary, CorrespondentSummary, DateSummary, Flow, NO_CORRESPONDENT,
    Totals, TransactionRecord,
};
