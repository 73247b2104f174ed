mod aggregate;
mod cli;
mod config;
mod domain;
mod error;
mod filter;
mod parser;
mod projection;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::info;

use crate::cli::Cli;
use crate::config::RunConfig;
use crate::report::Report;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cashflow=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cfg = RunConfig::from_cli(Cli::parse())?;

    let transactions = parser::load_ledger(&cfg.file)?;
    let filtered = filter::apply(&transactions, &cfg.filter);
    info!(
        parsed = transactions.len(),
        kept = filtered.len(),
        "applied filters"
    );

    let projection = projection::build(filtered, &cfg.projection);
    let report = Report::build(&projection, cfg.top_n);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cfg.json {
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to encode report")?;
        writeln!(out)?;
    } else {
        report::write_console(&mut out, &report).context("Failed to write report")?;
    }

    if let Some(path) = &cfg.export_md {
        match report::export_markdown(path, &report) {
            // Keep stdout a single JSON document.
            Ok(()) if cfg.json => eprintln!("📁 Exported projection to: {}", path.display()),
            Ok(()) => writeln!(out, "📁 Exported projection to: {}", path.display())?,
            // Export failures are reported but keep exit status 0.
            Err(err) => eprintln!("Error writing markdown: {:#}", anyhow::Error::from(err)),
        }
    }
    out.flush()?;
    Ok(())
}
