//! Deterministic keyword categorizer for statement descriptions.
//!
//! Every place that needs a category (aggregation, filtering, per-date
//! breakdowns) goes through [`classify`], which reads the single ordered
//! [`CATEGORY_RULES`] table. Rules are tested top to bottom and the first
//! match wins, so a description mentioning both "service" and "fee" lands in
//! whichever rule comes first.

use std::collections::HashMap;

/// Label for blank descriptions.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Label for descriptions no rule matches.
pub const OTHER: &str = "Other";

/// One keyword rule: any keyword found in the lower-cased description selects
/// `label`.
///
/// A keyword must start a word. Plain keywords must also end it, allowing an
/// `s`/`es` plural; a trailing `*` marks a stem that may run on (`превод*`
/// matches "преводи"). So "rent" does not fire inside "current".
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered rule table. Keywords are lower-case; Bulgarian spellings sit next
/// to the English ones because statements mix both.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        label: "Interest payment",
        keywords: &["interest", "лихва", "лихви"],
    },
    CategoryRule {
        label: "Fees",
        keywords: &["fee", "commission", "такса", "комисион*"],
    },
    CategoryRule {
        label: "Salary",
        keywords: &["salary", "payroll", "wage", "заплата", "заплати", "възнагражд*"],
    },
    CategoryRule {
        label: "Rent",
        keywords: &["rent", "наем*"],
    },
    CategoryRule {
        label: "Taxes",
        keywords: &["tax", "данък", "данъци", "ддс"],
    },
    CategoryRule {
        label: "Utilities",
        keywords: &["electricity", "water", "heating", "електроенергия", "вода", "парно"],
    },
    CategoryRule {
        label: "Cash withdrawal",
        keywords: &["atm", "cash withdrawal", "теглене", "банкомат*"],
    },
    CategoryRule {
        label: "Card payment",
        keywords: &["card payment", "pos terminal", "картово плащане", "плащане с карта"],
    },
    CategoryRule {
        label: "Transfer",
        keywords: &["transfer", "превод*"],
    },
    CategoryRule {
        label: "Services",
        keywords: &["service", "услуг*"],
    },
    CategoryRule {
        label: "Goods",
        keywords: &["invoice", "goods", "фактур*", "стоки"],
    },
];

/// Map a description to its category label.
pub fn classify(description: &str) -> &'static str {
    let desc = description.trim();
    if desc.is_empty() {
        return UNCATEGORIZED;
    }

    let desc = desc.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| keyword_matches(&desc, kw)))
        .map(|rule| rule.label)
        .unwrap_or(OTHER)
}

fn keyword_matches(desc: &str, keyword: &str) -> bool {
    let (kw, stem) = match keyword.strip_suffix('*') {
        Some(kw) => (kw, true),
        None => (keyword, false),
    };
    desc.match_indices(kw).any(|(i, m)| {
        let starts_word = desc[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        if !starts_word {
            return false;
        }
        if stem {
            return true;
        }
        let rest = desc[i + m.len()..]
            .split(|c: char| !c.is_alphanumeric())
            .next()
            .unwrap_or("");
        matches!(rest, "" | "s" | "es")
    })
}

/// Every label [`classify`] can return, in rule order.
pub fn category_labels() -> impl Iterator<Item = &'static str> {
    CATEGORY_RULES
        .iter()
        .map(|rule| rule.label)
        .chain([OTHER, UNCATEGORIZED])
}

/// Per-pass memo for [`classify`], keyed by description.
///
/// Lives for one aggregation or filter call and borrows descriptions from the
/// records being processed; nothing is cached on the records themselves.
#[derive(Debug, Default)]
pub struct CategoryCache<'a> {
    seen: HashMap<&'a str, &'static str>,
}

impl<'a> CategoryCache<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, description: &'a str) -> &'static str {
        *self
            .seen
            .entry(description)
            .or_insert_with(|| classify(description))
    }

    /// Number of distinct descriptions classified so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
