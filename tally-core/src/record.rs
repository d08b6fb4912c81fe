//! Statement record and summary types shared by every analytics view

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label used for records whose correspondent column is blank.
pub const NO_CORRESPONDENT: &str = "No correspondent";

/// One parsed statement line. Amounts are non-negative: a record is either an
/// outflow (`payments`) or an inflow (`receipts`), never a netted value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Date as it appears in the statement (display format)
    pub date: String,
    pub time: String,
    /// Outflow in the primary currency
    pub payments: f64,
    /// Outflow in the secondary currency
    pub payments_alt: f64,
    /// Inflow in the primary currency
    pub receipts: f64,
    /// Inflow in the secondary currency
    pub receipts_alt: f64,
    /// Free text; drives categorization
    pub description: String,
    /// Counterparty name, may be empty
    pub correspondent: String,
    pub interim_balance: f64,
    pub interim_balance_alt: f64,
    pub payment_basis: String,
    pub notes: String,
    pub reference: String,
    pub debit_advice: String,
}

impl TransactionRecord {
    /// Create a record with the fields the analytics actually read.
    pub fn new(
        date: impl Into<String>,
        payments: f64,
        receipts: f64,
        description: impl Into<String>,
        correspondent: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            payments,
            receipts,
            description: description.into(),
            correspondent: correspondent.into(),
            ..Self::default()
        }
    }

    /// Set the secondary-currency amounts
    pub fn with_alt(mut self, payments_alt: f64, receipts_alt: f64) -> Self {
        self.payments_alt = payments_alt;
        self.receipts_alt = receipts_alt;
        self
    }

    /// Correspondent with the blank-name sentinel applied.
    pub fn correspondent_label(&self) -> &str {
        let name = self.correspondent.trim();
        if name.is_empty() { NO_CORRESPONDENT } else { &self.correspondent }
    }
}

/// Summed amounts for a group of records, in both currencies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub payments: f64,
    pub receipts: f64,
    pub payments_alt: f64,
    pub receipts_alt: f64,
}

impl Totals {
    pub fn add(&mut self, record: &TransactionRecord) {
        self.payments += record.payments;
        self.receipts += record.receipts;
        self.payments_alt += record.payments_alt;
        self.receipts_alt += record.receipts_alt;
    }

    /// Primary-currency volume; the ranking key for category and correspondent views.
    pub fn volume(&self) -> f64 {
        self.payments + self.receipts
    }

    /// Receipts minus payments, primary currency
    pub fn net(&self) -> f64 {
        self.receipts - self.payments
    }

    pub fn net_alt(&self) -> f64 {
        self.receipts_alt - self.payments_alt
    }
}

/// Primary-currency payments/receipts pair used in per-date breakdowns.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Flow {
    pub payments: f64,
    pub receipts: f64,
}

impl Flow {
    pub fn add(&mut self, record: &TransactionRecord) {
        self.payments += record.payments;
        self.receipts += record.receipts;
    }

    pub fn net(&self) -> f64 {
        self.receipts - self.payments
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    #[serde(flatten)]
    pub totals: Totals,
    /// Number of records in the group
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrespondentSummary {
    pub correspondent: String,
    #[serde(flatten)]
    pub totals: Totals,
    pub count: usize,
}

/// Totals for one date string, plus the category and correspondent
/// decomposition of that date (used by per-selection time series).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateSummary {
    pub date: String,
    #[serde(flatten)]
    pub totals: Totals,
    pub count: usize,
    pub by_category: BTreeMap<String, Flow>,
    pub by_correspondent: BTreeMap<String, Flow>,
}

/// Aggregate root: the records plus every derived view of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsData {
    pub records: Vec<TransactionRecord>,
    pub total_payments: f64,
    pub total_receipts: f64,
    pub total_payments_alt: f64,
    pub total_receipts_alt: f64,
    pub by_date: Vec<DateSummary>,
    pub by_category: Vec<CategorySummary>,
    pub by_correspondent: Vec<CorrespondentSummary>,
    /// Category selection this view was filtered by (empty = unfiltered)
    #[serde(default)]
    pub selected_categories: BTreeSet<String>,
    /// Correspondent selection this view was filtered by (empty = unfiltered)
    #[serde(default)]
    pub selected_correspondents: BTreeSet<String>,
}

impl AnalyticsData {
    /// Grand totals as a `Totals` value
    pub fn totals(&self) -> Totals {
        Totals {
            payments: self.total_payments,
            receipts: self.total_receipts,
            payments_alt: self.total_payments_alt,
            receipts_alt: self.total_receipts_alt,
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.selected_categories.is_empty() || !self.selected_correspondents.is_empty()
    }

    pub fn category(&self, label: &str) -> Option<&CategorySummary> {
        self.by_category.iter().find(|c| c.category == label)
    }

    pub fn correspondent(&self, name: &str) -> Option<&CorrespondentSummary> {
        self.by_correspondent.iter().find(|c| c.correspondent == name)
    }

    pub fn date(&self, date: &str) -> Option<&DateSummary> {
        self.by_date.iter().find(|d| d.date == date)
    }
}
