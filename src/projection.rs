use crate::domain::Transaction;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// What-if settings: tag -> fractional delta, plus tags whose entries are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionConfig {
    pub adjustments: BTreeMap<String, Decimal>,
    /// Lowercased; matched case-insensitively.
    pub removals: BTreeSet<String>,
}

impl ProjectionConfig {
    pub fn from_specs(adjust: Option<&str>, remove: Option<&str>) -> Self {
        Self {
            adjustments: adjust.map(parse_adjustments).unwrap_or_default(),
            removals: remove.map(parse_removals).unwrap_or_default(),
        }
    }

    fn is_removed(&self, txn: &Transaction) -> bool {
        txn.tags
            .iter()
            .any(|t| self.removals.contains(&t.to_lowercase()))
    }

    /// Projected copy of `txn`, or `None` when a removal tag excludes it.
    pub fn project(&self, txn: &Transaction) -> Option<Transaction> {
        if self.is_removed(txn) {
            return None;
        }

        let mut out = txn.clone();
        if let Some(magnitude) = txn.projected_amount {
            let sign = if txn.amount < Decimal::ZERO {
                Decimal::NEGATIVE_ONE
            } else {
                Decimal::ONE
            };
            out.amount = sign * magnitude;
        } else if let Some(delta) = txn.tags.iter().find_map(|t| self.adjustments.get(t)) {
            // First listed tag with an adjustment wins; deltas never stack.
            match Decimal::ONE
                .checked_add(*delta)
                .and_then(|factor| txn.amount.checked_mul(factor))
            {
                Some(amount) => out.amount = amount,
                None => debug!(
                    description = %txn.description,
                    %delta,
                    "adjustment overflows the decimal range, keeping amount"
                ),
            }
        }
        Some(out)
    }
}

/// `Food=-0.5,Salary=0.1`. Malformed entries are skipped; later keys overwrite earlier ones.
pub fn parse_adjustments(spec: &str) -> BTreeMap<String, Decimal> {
    let mut out = BTreeMap::new();
    for entry in spec.split(',') {
        if entry.trim().is_empty() {
            continue;
        }
        let Some((tag, raw)) = entry.split_once('=') else {
            debug!(entry, "skipping adjustment without '='");
            continue;
        };
        match raw.trim().parse::<Decimal>() {
            Ok(delta) => {
                out.insert(tag.trim().to_string(), delta);
            }
            Err(err) => debug!(entry, %err, "skipping adjustment with invalid fraction"),
        }
    }
    out
}

pub fn parse_removals(spec: &str) -> BTreeSet<String> {
    spec.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub original: Vec<Transaction>,
    pub projected: Vec<Transaction>,
    pub config: ProjectionConfig,
}

/// Copies-then-modifies; `original` is returned untouched for comparison.
pub fn build(original: Vec<Transaction>, cfg: &ProjectionConfig) -> Projection {
    let projected: Vec<Transaction> = original.iter().filter_map(|t| cfg.project(t)).collect();
    info!(
        original = original.len(),
        projected = projected.len(),
        adjustments = cfg.adjustments.len(),
        removals = cfg.removals.len(),
        "built projection"
    );
    Projection {
        original,
        projected,
        config: cfg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> Decimal {
        raw.parse().expect("decimal")
    }

    fn txn(amount: &str, tags: &[&str], projected: Option<&str>) -> Transaction {
        Transaction {
            date: None,
            amount: d(amount),
            description: "entry".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            projected_amount: projected.map(d),
        }
    }

    #[test]
    fn adjustment_spec_skips_malformed_entries() {
        let adj = parse_adjustments("Food=-0.5, Salary = 0.1,,Broken,Bad=abc,Food=-0.25");
        assert_eq!(adj.len(), 2);
        assert_eq!(adj["Food"], d("-0.25"));
        assert_eq!(adj["Salary"], d("0.1"));
    }

    #[test]
    fn adjustment_splits_on_first_equals_only() {
        let adj = parse_adjustments("A=1=2,B=0.5");
        assert!(!adj.contains_key("A"));
        assert_eq!(adj["B"], d("0.5"));
    }

    #[test]
    fn removal_spec_trims_and_lowercases() {
        let rm = parse_removals(" Food ,, Rent,");
        assert_eq!(rm.into_iter().collect::<Vec<_>>(), ["food", "rent"]);
    }

    #[test]
    fn inline_projection_keeps_the_original_sign() {
        let cfg = ProjectionConfig::default();
        let out = cfg.project(&txn("-10", &["Food"], Some("8"))).expect("kept");
        assert_eq!(out.amount, d("-8"));

        let out = cfg.project(&txn("100", &["Bonus"], Some("120"))).expect("kept");
        assert_eq!(out.amount, d("120"));
    }

    #[test]
    fn inline_projection_overrides_tag_adjustment() {
        let cfg = ProjectionConfig::from_specs(Some("Food=-0.5"), None);
        let out = cfg.project(&txn("-10", &["Food"], Some("8"))).expect("kept");
        assert_eq!(out.amount, d("-8"));
    }

    #[test]
    fn tag_adjustment_scales_the_amount() {
        let cfg = ProjectionConfig::from_specs(Some("Food=-0.5"), None);
        let out = cfg.project(&txn("-10", &["Food"], None)).expect("kept");
        assert_eq!(out.amount, d("-5"));
    }

    #[test]
    fn first_listed_tag_wins() {
        let cfg = ProjectionConfig::from_specs(Some("Food=-0.5,Salary=0.2"), None);
        let out = cfg.project(&txn("-10", &["Food", "Salary"], None)).expect("kept");
        assert_eq!(out.amount, d("-5"));

        let out = cfg.project(&txn("-10", &["Salary", "Food"], None)).expect("kept");
        assert_eq!(out.amount, d("-12"));
    }

    #[test]
    fn unmatched_entries_are_unchanged() {
        let cfg = ProjectionConfig::from_specs(Some("Food=-0.5"), Some("Rent"));
        let t = txn("-3", &["Transport"], None);
        assert_eq!(cfg.project(&t), Some(t));
    }

    #[test]
    fn removal_excludes_from_projection_only() {
        let original = vec![
            txn("2000", &["Salary"], None),
            txn("-10", &["food", "Dining"], None),
            txn("-800", &["Rent"], None),
        ];
        let cfg = ProjectionConfig::from_specs(None, Some("Food"));
        let p = build(original.clone(), &cfg);
        assert_eq!(p.original, original);
        assert_eq!(p.projected.len(), 2);
        assert!(p.projected.iter().all(|t| !t.has_tag("food")));
    }

    #[test]
    fn overflowing_adjustment_keeps_the_amount() {
        let cfg = ProjectionConfig::from_specs(Some("Food=10000000000"), None);
        let big = txn("-100000000000000000000", &["Food"], None);
        let out = cfg.project(&big).expect("kept");
        assert_eq!(out.amount, d("-100000000000000000000"));

        let cfg = ProjectionConfig::from_specs(Some("Food=79228162514264337593543950335"), None);
        let out = cfg.project(&txn("-1", &["Food"], None)).expect("kept");
        assert_eq!(out.amount, d("-1"));
    }

    #[test]
    fn removal_beats_inline_projection() {
        let cfg = ProjectionConfig::from_specs(None, Some("food"));
        assert_eq!(cfg.project(&txn("-10", &["Food"], Some("8"))), None);
    }
}
