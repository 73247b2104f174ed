use crate::domain::Kind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cashflow")]
#[command(about = "Summarize a cash-flow ledger and project what-if scenarios", long_about = None)]
pub struct Cli {
    /// Cashflow markdown file to process.
    #[arg(long, env = "CASHFLOW_FILE", default_value = "sample-cashflow.md")]
    pub file: PathBuf,

    /// Only keep transactions carrying this tag (case-insensitive).
    #[arg(long)]
    pub tag: Option<String>,

    /// Only keep income or expense transactions.
    #[arg(long = "type", value_enum, ignore_case = true)]
    pub kind: Option<Kind>,

    /// Inclusive start date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Inclusive end date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,

    /// Comma-separated tags to drop from the projection, e.g. "Food,Rent".
    #[arg(long)]
    pub remove: Option<String>,

    /// Comma-separated tag adjustments, e.g. "Food=-0.5,Salary=0.1".
    #[arg(long, allow_hyphen_values = true)]
    pub adjust: Option<String>,

    /// Export the side-by-side projection as a Markdown file.
    #[arg(long = "export-md")]
    pub export_md: Option<PathBuf>,

    /// Number of expense tags shown in the high-impact ranking.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}
