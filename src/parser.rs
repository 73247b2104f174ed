use crate::domain::Transaction;
use crate::error::CashflowError;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static DATE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(\d{4}-\d{2}-\d{2})$").expect("date heading regex"));

// - 9.49 Coffee [Tag1, Tag2] (5.20)
static TXN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])\s*([\d.]+)\s+(.+?)(?:\s+\[([^\]]+)\])?(?:\s+\(([\d.]+)\))?$")
        .expect("transaction line regex")
});

/// Line-at-a-time ledger reader holding the current date heading.
#[derive(Debug, Default)]
pub struct LedgerParser {
    current_date: Option<NaiveDate>,
}

impl LedgerParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw line. Returns a transaction only for a well-formed entry line;
    /// headings move the date cursor and everything else is skipped.
    pub fn feed_line(&mut self, raw: &str) -> Option<Transaction> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(caps) = DATE_HEADING.captures(line) {
            match NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
                Ok(date) => self.current_date = Some(date),
                Err(err) => debug!(line, %err, "ignoring heading with invalid date"),
            }
            return None;
        }

        let Some(caps) = TXN_LINE.captures(line) else {
            debug!(line, "skipping unrecognised line");
            return None;
        };

        let magnitude = match caps[2].parse::<Decimal>() {
            Ok(m) => m,
            Err(err) if caps[2].matches('.').count() <= 1 => {
                warn!(line, %err, "skipping amount outside the supported decimal range");
                return None;
            }
            Err(err) => {
                debug!(line, %err, "skipping line with invalid amount");
                return None;
            }
        };
        let amount = if &caps[1] == "-" { -magnitude } else { magnitude };

        let tags: Vec<String> = caps
            .get(4)
            .map(|m| m.as_str().split(',').map(|t| t.trim().to_string()).collect())
            .unwrap_or_default();

        let projected_amount = caps.get(5).and_then(|m| m.as_str().parse::<Decimal>().ok());

        Some(Transaction {
            date: self.current_date,
            amount,
            description: caps[3].trim().to_string(),
            tags,
            projected_amount,
        })
    }
}

/// Parses a whole ledger stream in input order. Only a read failure is an error;
/// bytes that are not UTF-8 are replaced rather than failing the stream.
pub fn parse_ledger<R: BufRead>(reader: R) -> std::io::Result<Vec<Transaction>> {
    let mut parser = LedgerParser::new();
    let mut out = Vec::new();
    for raw in reader.split(b'\n') {
        let raw = raw?;
        let line = String::from_utf8_lossy(&raw);
        if let Some(txn) = parser.feed_line(&line) {
            out.push(txn);
        }
    }
    Ok(out)
}

pub fn load_ledger(path: &Path) -> Result<Vec<Transaction>, CashflowError> {
    let io_err = |source| CashflowError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let transactions = parse_ledger(BufReader::new(file)).map_err(io_err)?;
    info!(path = %path.display(), count = transactions.len(), "parsed ledger");
    Ok(transactions)
}
