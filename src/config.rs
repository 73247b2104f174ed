use crate::cli::Cli;
use crate::error::CashflowError;
use crate::filter::FilterConfig;
use crate::projection::ProjectionConfig;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Everything a run needs, resolved up front and handed to each stage explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub filter: FilterConfig,
    pub projection: ProjectionConfig,
    pub export_md: Option<PathBuf>,
    pub top_n: usize,
    pub json: bool,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, CashflowError> {
        let filter = FilterConfig {
            tag: cli.tag.filter(|t| !t.is_empty()),
            kind: cli.kind,
            from: parse_date_flag("from", cli.from.as_deref())?,
            to: parse_date_flag("to", cli.to.as_deref())?,
        };
        let projection = ProjectionConfig::from_specs(cli.adjust.as_deref(), cli.remove.as_deref());

        Ok(Self {
            file: cli.file,
            filter,
            projection,
            export_md: cli.export_md,
            top_n: cli.top,
            json: cli.json,
        })
    }
}

fn parse_date_flag(
    flag: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, CashflowError> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CashflowError::InvalidDate {
                flag,
                value: s.to_string(),
            }),
    }
}
