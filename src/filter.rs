use crate::domain::{Kind, Transaction};
use chrono::NaiveDate;

/// Narrowing applied before any summary. Unset fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    pub tag: Option<String>,
    pub kind: Option<Kind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FilterConfig {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(tag) = &self.tag {
            if !txn.has_tag(tag) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if txn.kind() != kind {
                return false;
            }
        }
        // Undated entries sort before every date: excluded by `from`, kept by `to`.
        if let Some(from) = self.from {
            if txn.date < Some(from) {
                return false;
            }
        }
        if let Some(to) = self.to {
            if txn.date > Some(to) {
                return false;
            }
        }
        true
    }
}

pub fn apply(transactions: &[Transaction], cfg: &FilterConfig) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| cfg.matches(t))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;

    fn txn(date: Option<(i32, u32, u32)>, amount: i64, tags: &[&str]) -> Transaction {
        Transaction {
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            amount: Decimal::from(amount),
            description: format!("txn {amount}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            projected_amount: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(None, -1, &["Misc"]),
            txn(Some((2024, 1, 5)), 2000, &["Salary"]),
            txn(Some((2024, 1, 10)), -30, &["Food", "Dining"]),
            txn(Some((2024, 2, 1)), -800, &["Rent"]),
            txn(Some((2024, 2, 15)), -12, &["food"]),
        ]
    }

    fn amounts(txns: &[Transaction]) -> Vec<i64> {
        txns.iter()
            .map(|t| t.amount.to_i64().expect("integral"))
            .collect()
    }

    #[test]
    fn empty_config_returns_input_unchanged() {
        let input = sample();
        assert_eq!(apply(&input, &FilterConfig::default()), input);
    }

    #[test]
    fn tag_filter_is_case_insensitive() {
        let cfg = FilterConfig {
            tag: Some("FOOD".to_string()),
            ..Default::default()
        };
        assert_eq!(amounts(&apply(&sample(), &cfg)), [-30, -12]);
    }

    #[test]
    fn kind_filter_selects_by_sign() {
        let cfg = FilterConfig {
            kind: Some(Kind::Income),
            ..Default::default()
        };
        assert_eq!(amounts(&apply(&sample(), &cfg)), [2000]);

        let cfg = FilterConfig {
            kind: Some(Kind::Expense),
            ..Default::default()
        };
        assert_eq!(amounts(&apply(&sample(), &cfg)), [-1, -30, -800, -12]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let cfg = FilterConfig {
            from: NaiveDate::from_ymd_opt(2024, 1, 10),
            to: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert_eq!(amounts(&apply(&sample(), &cfg)), [-30, -800]);
    }

    #[test]
    fn undated_entries_fail_from_but_pass_to() {
        let from = FilterConfig {
            from: NaiveDate::from_ymd_opt(2000, 1, 1),
            ..Default::default()
        };
        assert!(!from.matches(&sample()[0]));

        let to = FilterConfig {
            to: NaiveDate::from_ymd_opt(2000, 1, 1),
            ..Default::default()
        };
        assert!(to.matches(&sample()[0]));
    }

    #[test]
    fn all_constraints_combine() {
        let cfg = FilterConfig {
            tag: Some("food".to_string()),
            kind: Some(Kind::Expense),
            from: NaiveDate::from_ymd_opt(2024, 2, 1),
            to: None,
        };
        assert_eq!(amounts(&apply(&sample(), &cfg)), [-12]);
    }
}
