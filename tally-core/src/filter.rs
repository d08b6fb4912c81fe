//! Filter layer: narrows canonical analytics to a category/correspondent
//! selection and recomputes every view from the surviving records.
//!
//! Matching rules:
//! - an empty selection matches everything
//! - a non-empty selection matches any of its labels (OR)
//! - category match AND correspondent match
//!
//! The flat category/correspondent views are then cut down to the selected
//! labels, and the selections are echoed on the result so renderers can
//! decide between per-selection and aggregate series.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::aggregate::{classify_all, summarize};
use crate::record::AnalyticsData;

/// Restrict `base` to the selected categories and correspondents.
///
/// With both selections empty the base is handed back as-is
/// (`Cow::Borrowed`); otherwise a fresh value is built. `base` is never
/// modified.
pub fn apply_filter<'a>(
    base: &'a AnalyticsData,
    selected_categories: &BTreeSet<String>,
    selected_correspondents: &BTreeSet<String>,
) -> Cow<'a, AnalyticsData> {
    if selected_categories.is_empty() && selected_correspondents.is_empty() {
        return Cow::Borrowed(base);
    }

    let labels = classify_all(&base.records);
    let mut records = Vec::new();
    let mut categories = Vec::new();

    for (record, &category) in base.records.iter().zip(&labels) {
        let category_match =
            selected_categories.is_empty() || selected_categories.contains(category);
        let correspondent_match = selected_correspondents.is_empty()
            || selected_correspondents.contains(record.correspondent_label());

        if category_match && correspondent_match {
            records.push(record.clone());
            categories.push(category);
        }
    }

    let mut filtered = summarize(records, &categories);

    if !selected_categories.is_empty() {
        filtered
            .by_category
            .retain(|c| selected_categories.contains(&c.category));
    }
    if !selected_correspondents.is_empty() {
        filtered
            .by_correspondent
            .retain(|c| selected_correspondents.contains(&c.correspondent));
    }

    filtered.selected_categories = selected_categories.clone();
    filtered.selected_correspondents = selected_correspondents.clone();

    tracing::debug!(
        kept = filtered.records.len(),
        of = base.records.len(),
        categories = selected_categories.len(),
        correspondents = selected_correspondents.len(),
        "applied filter"
    );

    Cow::Owned(filtered)
}

/// Selection state over one canonical dataset.
///
/// Keeps the unfiltered analytics so clearing the selection never needs a
/// re-ingest; every [`FilterSession::view`] is derived from that base.
#[derive(Debug, Clone)]
pub struct FilterSession {
    base: AnalyticsData,
    categories: BTreeSet<String>,
    correspondents: BTreeSet<String>,
}

impl FilterSession {
    pub fn new(base: AnalyticsData) -> Self {
        Self {
            base,
            categories: BTreeSet::new(),
            correspondents: BTreeSet::new(),
        }
    }

    pub fn base(&self) -> &AnalyticsData {
        &self.base
    }

    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn selected_correspondents(&self) -> &BTreeSet<String> {
        &self.correspondents
    }

    /// Add the category if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle_category(&mut self, label: &str) -> bool {
        toggle(&mut self.categories, label)
    }

    pub fn toggle_correspondent(&mut self, name: &str) -> bool {
        toggle(&mut self.correspondents, name)
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.correspondents.clear();
    }

    /// Analytics for the current selection.
    pub fn view(&self) -> Cow<'_, AnalyticsData> {
        apply_filter(&self.base, &self.categories, &self.correspondents)
    }
}

fn toggle(set: &mut BTreeSet<String>, label: &str) -> bool {
    if set.remove(label) {
        false
    } else {
        set.insert(label.to_string());
        true
    }
}
