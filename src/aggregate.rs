//! Totals and tag breakdowns over any transaction slice.
//!
//! Every function here is pure: the same slice always yields the same figures.
//! Sums saturate at the `Decimal` bounds instead of overflowing.

use crate::domain::{TagKey, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    /// Sum of negative amounts, kept negative.
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in transactions {
        if t.amount >= Decimal::ZERO {
            income = income.saturating_add(t.amount);
        } else {
            expenses = expenses.saturating_add(t.amount);
        }
    }
    Totals {
        income,
        expenses,
        net: income.saturating_add(expenses),
    }
}

/// Sum per tag. A transaction counts in full toward each of its tags; untagged entries
/// land in [`TagKey::Untagged`]. Keys iterate in sorted order.
pub fn tag_totals(transactions: &[Transaction]) -> BTreeMap<TagKey, Decimal> {
    let mut out = BTreeMap::new();
    for t in transactions {
        for key in t.tag_keys() {
            let total = out.entry(key).or_insert(Decimal::ZERO);
            *total = total.saturating_add(t.amount);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStats {
    pub tag: TagKey,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
}

/// Expense-only tag ranking, most negative total first, truncated to `top_n`.
pub fn high_impact_tags(transactions: &[Transaction], top_n: usize) -> Vec<TagStats> {
    let mut acc: BTreeMap<TagKey, (Decimal, usize)> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.amount < Decimal::ZERO) {
        for key in t.tag_keys() {
            let slot = acc.entry(key).or_insert((Decimal::ZERO, 0));
            slot.0 = slot.0.saturating_add(t.amount);
            slot.1 += 1;
        }
    }

    let mut stats: Vec<TagStats> = acc
        .into_iter()
        .map(|(tag, (total, count))| TagStats {
            tag,
            total,
            count,
            average: total / Decimal::from(count),
        })
        .collect();
    // Stable sort over key-ordered input: equal totals stay alphabetical.
    stats.sort_by(|a, b| a.total.cmp(&b.total));
    stats.truncate(top_n);
    stats
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum TagChange {
    Added {
        tag: TagKey,
        projected: Decimal,
    },
    Removed {
        tag: TagKey,
        original: Decimal,
    },
    Changed {
        tag: TagKey,
        original: Decimal,
        projected: Decimal,
    },
}

impl TagChange {
    pub fn tag(&self) -> &TagKey {
        match self {
            TagChange::Added { tag, .. }
            | TagChange::Removed { tag, .. }
            | TagChange::Changed { tag, .. } => tag,
        }
    }
}

/// Differences between two tag-total maps over the union of their keys, sorted by tag.
/// Tags with equal totals on both sides are omitted.
pub fn tag_diff(
    before: &BTreeMap<TagKey, Decimal>,
    after: &BTreeMap<TagKey, Decimal>,
) -> Vec<TagChange> {
    let keys: BTreeSet<&TagKey> = before.keys().chain(after.keys()).collect();
    keys.into_iter()
        .filter_map(|tag| match (before.get(tag), after.get(tag)) {
            (None, Some(&projected)) => Some(TagChange::Added {
                tag: tag.clone(),
                projected,
            }),
            (Some(&original), None) => Some(TagChange::Removed {
                tag: tag.clone(),
                original,
            }),
            (Some(&original), Some(&projected)) if original != projected => {
                Some(TagChange::Changed {
                    tag: tag.clone(),
                    original,
                    projected,
                })
            }
            _ => None,
        })
        .collect()
}
