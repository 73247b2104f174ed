use crate::aggregate::{self, TagChange, TagStats, Totals};
use crate::domain::{Kind, TagKey, Transaction, fmt_amount, fmt_date};
use crate::error::CashflowError;
use crate::projection::Projection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Figures shown for one run. Rendering below never recomputes anything.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    #[serde(serialize_with = "serialize_with_kind")]
    pub transactions: &'a [Transaction],
    pub summary: Totals,
    pub tag_totals: Vec<TagTotal>,
    pub high_impact: Vec<TagStats>,
    pub projection: Comparison,
}

/// A transaction as emitted in JSON, with its sign-derived kind spelled out.
#[derive(Serialize)]
struct TransactionRow<'a> {
    #[serde(flatten)]
    txn: &'a Transaction,
    kind: Kind,
}

fn serialize_with_kind<S: serde::Serializer>(
    txns: &&[Transaction],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(txns.iter().map(|txn| TransactionRow {
        txn,
        kind: txn.kind(),
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagTotal {
    pub tag: TagKey,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub adjustments: BTreeMap<String, Decimal>,
    pub removed_tags: Vec<String>,
    pub original: Totals,
    pub projected: Totals,
    pub tag_changes: Vec<TagChange>,
}

impl<'a> Report<'a> {
    pub fn build(projection: &'a Projection, top_n: usize) -> Self {
        let original = &projection.original;
        let original_tags = aggregate::tag_totals(original);
        let projected_tags = aggregate::tag_totals(&projection.projected);

        Self {
            transactions: original,
            summary: aggregate::totals(original),
            tag_totals: original_tags
                .iter()
                .map(|(tag, total)| TagTotal {
                    tag: tag.clone(),
                    total: *total,
                })
                .collect(),
            high_impact: aggregate::high_impact_tags(original, top_n),
            projection: Comparison {
                adjustments: projection.config.adjustments.clone(),
                removed_tags: projection.config.removals.iter().cloned().collect(),
                original: aggregate::totals(original),
                projected: aggregate::totals(&projection.projected),
                tag_changes: aggregate::tag_diff(&original_tags, &projected_tags),
            },
        }
    }
}

fn tag_list(tags: &[String]) -> String {
    format!("[{}]", tags.join(" "))
}

pub fn write_console(out: &mut impl Write, report: &Report<'_>) -> io::Result<()> {
    writeln!(out, "📊 Filtered Cash Flow Summary:")?;
    for t in report.transactions {
        writeln!(
            out,
            "{} [{}] {} - {} {}",
            fmt_date(t.date),
            t.kind(),
            fmt_amount(t.amount),
            t.description,
            tag_list(&t.tags)
        )?;
    }

    let s = report.summary;
    writeln!(out)?;
    writeln!(out, "Total Income:   {}", fmt_amount(s.income))?;
    writeln!(out, "Total Expenses: {}", fmt_amount(-s.expenses))?;
    writeln!(out, "Net:            {}", fmt_amount(s.net))?;
    writeln!(out)?;

    writeln!(out, "📌 Totals by Tag:")?;
    for row in &report.tag_totals {
        let category = if row.total < Decimal::ZERO {
            "Expense"
        } else {
            "Income"
        };
        writeln!(out, "  [{}] {}: {}", row.tag, category, fmt_amount(row.total))?;
    }
    writeln!(out)?;

    if !report.high_impact.is_empty() {
        writeln!(out, "💸 Top Expense Tags (High Impact):")?;
        for s in &report.high_impact {
            writeln!(
                out,
                "  [{}] Total: {} | Count: {} | Avg: {}",
                s.tag,
                fmt_amount(s.total),
                s.count,
                fmt_amount(s.average)
            )?;
        }
        writeln!(out)?;
    }

    write_side_by_side(out, &report.projection)
}

fn write_side_by_side(out: &mut impl Write, cmp: &Comparison) -> io::Result<()> {
    let (o, p) = (cmp.original, cmp.projected);
    writeln!(out, "📊 Side-by-Side Summary (Original → Projected)")?;
    if !cmp.adjustments.is_empty() {
        let adj: Vec<String> = cmp
            .adjustments
            .iter()
            .map(|(tag, delta)| format!("{tag}={delta}"))
            .collect();
        writeln!(out, "  Adjusted: {}", adj.join(", "))?;
    }
    if !cmp.removed_tags.is_empty() {
        writeln!(out, "  Removed:  {}", cmp.removed_tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  Income:    {:>8}  →  {:>8}",
        fmt_amount(o.income),
        fmt_amount(p.income)
    )?;
    writeln!(
        out,
        "  Expenses:  {:>8}  →  {:>8}",
        fmt_amount(-o.expenses),
        fmt_amount(-p.expenses)
    )?;
    writeln!(
        out,
        "  Net:       {:>8}  →  {:>8}",
        fmt_amount(o.net),
        fmt_amount(p.net)
    )?;
    writeln!(out)?;

    writeln!(out, "🔍 Tag Changes:")?;
    for change in &cmp.tag_changes {
        match change {
            TagChange::Added { tag, projected } => {
                writeln!(out, "  [{tag}] added:    {}", fmt_amount(*projected))?
            }
            TagChange::Removed { tag, original } => {
                writeln!(out, "  [{tag}] removed:  {}", fmt_amount(*original))?
            }
            TagChange::Changed {
                tag,
                original,
                projected,
            } => writeln!(
                out,
                "  [{tag}] changed:  {} → {}",
                fmt_amount(*original),
                fmt_amount(*projected)
            )?,
        }
    }
    writeln!(out)
}

pub fn write_markdown(out: &mut impl Write, report: &Report<'_>) -> io::Result<()> {
    let cmp = &report.projection;
    let (o, p) = (cmp.original, cmp.projected);

    writeln!(out, "# 📊 Cash Flow Projection")?;
    writeln!(out)?;
    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Original | Projected |")?;
    writeln!(out, "|--------|----------|-----------|")?;
    writeln!(out, "| Income | {} | {} |", fmt_amount(o.income), fmt_amount(p.income))?;
    writeln!(
        out,
        "| Expenses | {} | {} |",
        fmt_amount(-o.expenses),
        fmt_amount(-p.expenses)
    )?;
    writeln!(out, "| Net | {} | {} |", fmt_amount(o.net), fmt_amount(p.net))?;
    writeln!(out)?;

    writeln!(out, "## Tag Differences")?;
    writeln!(out)?;
    writeln!(out, "| Tag | Original | Projected |")?;
    writeln!(out, "|-----|----------|-----------|")?;
    for change in &cmp.tag_changes {
        let (original, projected) = match change {
            TagChange::Added { projected, .. } => ("–".to_string(), fmt_amount(*projected)),
            TagChange::Removed { original, .. } => (fmt_amount(*original), "–".to_string()),
            TagChange::Changed {
                original,
                projected,
                ..
            } => (fmt_amount(*original), fmt_amount(*projected)),
        };
        writeln!(out, "| {} | {original} | {projected} |", change.tag())?;
    }
    writeln!(out)?;

    writeln!(out, "## 💸 Top Expense Tags (High Impact)")?;
    writeln!(out)?;
    writeln!(out, "| Tag | Total | Count | Avg per Transaction |")?;
    writeln!(out, "|-----|-------|-------|---------------------|")?;
    for s in &report.high_impact {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            s.tag,
            fmt_amount(s.total),
            s.count,
            fmt_amount(s.average)
        )?;
    }
    Ok(())
}

pub fn export_markdown(path: &Path, report: &Report<'_>) -> Result<(), CashflowError> {
    let export_err = |source| CashflowError::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(export_err)?;
    let mut out = BufWriter::new(file);
    write_markdown(&mut out, report).map_err(export_err)?;
    out.flush().map_err(export_err)
}
