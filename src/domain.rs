use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn of(amount: Decimal) -> Self {
        if amount >= Decimal::ZERO {
            Kind::Income
        } else {
            Kind::Expense
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Date of the most recent heading above the entry; `None` before any heading.
    pub date: Option<NaiveDate>,
    /// Signed amount: positive is income, negative is expense.
    pub amount: Decimal,
    pub description: String,
    /// Tags in written order. Empty means untagged.
    pub tags: Vec<String>,
    /// Inline `(x)` override, always a magnitude.
    pub projected_amount: Option<Decimal>,
}

impl Transaction {
    pub fn kind(&self) -> Kind {
        Kind::of(self.amount)
    }

    /// Case-insensitive tag membership, used by filtering and removal.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Aggregation keys for this transaction, exact case.
    pub fn tag_keys(&self) -> Vec<TagKey> {
        if self.tags.is_empty() {
            vec![TagKey::Untagged]
        } else {
            self.tags.iter().cloned().map(TagKey::Tag).collect()
        }
    }
}

/// Aggregation bucket. `Untagged` never collides with a user tag, even one named "untagged".
///
/// Ordering is lexicographic over real tags, with `Untagged` after all of them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum TagKey {
    Tag(String),
    Untagged,
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Tag(t) => f.write_str(t),
            TagKey::Untagged => f.write_str("(untagged)"),
        }
    }
}

/// Two-decimal display rounding. Values are never rounded before this point.
pub fn fmt_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // No "-0.00" for empty expense sums.
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    format!("{rounded:.2}")
}

pub fn fmt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "undated".to_string(),
    }
}
