use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CashflowError {
    #[error("Failed to read ledger {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid --{flag} date format: {value} (expected YYYY-MM-DD)")]
    InvalidDate { flag: &'static str, value: String },

    #[error("Failed to write markdown export {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
