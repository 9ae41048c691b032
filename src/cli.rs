// src/cli.rs

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::constants::{
    DATE_DIR_FORMAT, DEFAULT_GATE_ATTEMPTS, DEFAULT_MIN_BYTES, DEFAULT_POLL_SECS,
};
use crate::pipeline::completeness::{RetryPolicy, Threshold};

/// Render daily diagnostic rollups and charts for one remote monitoring unit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Platform name of the unit to run the diagnostic code on, e.g. GBUAPCDPI1
    #[arg(short, long)]
    pub platform: String,

    /// Date to generate rollups and plots for, e.g. 08-05-2026.
    /// Defaults to yesterday, matching scheduled (cron) invocations that
    /// report on the previous day once its uploads have settled.
    #[arg(short, long)]
    pub date: Option<String>,

    /// Root of the per-platform data directories
    #[arg(long, default_value = "./data")]
    pub data_root: PathBuf,

    /// Completeness check: minimum raw file size in bytes
    #[arg(long, conflicts_with = "expected_rows")]
    pub min_bytes: Option<u64>,

    /// Completeness check: expected data row count per window (e.g. 600 for
    /// a 10-minute window at 1 Hz)
    #[arg(long)]
    pub expected_rows: Option<usize>,

    /// Seconds between completeness polls
    #[arg(long, default_value_t = DEFAULT_POLL_SECS)]
    pub poll_secs: u64,

    /// Completeness checks per file before deferring it to a later run
    #[arg(long, default_value_t = DEFAULT_GATE_ATTEMPTS)]
    pub attempts: u32,

    /// When set, log to `<dir>/<MM-DD-YYYY>.log` instead of stderr
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Target date: the explicit argument, else yesterday in local time.
    pub fn target_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        match &self.date {
            Some(arg) => NaiveDate::parse_from_str(arg, DATE_DIR_FORMAT),
            None => Ok(Local::now().date_naive() - chrono::Days::new(1)),
        }
    }

    /// Which completeness check this deployment uses. Row count wins when
    /// given; otherwise the byte-size minimum (with its default).
    pub fn threshold(&self) -> Threshold {
        match self.expected_rows {
            Some(rows) => Threshold::ExpectedRows(rows),
            None => Threshold::MinBytes(self.min_bytes.unwrap_or(DEFAULT_MIN_BYTES)),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.attempts,
            poll_interval: Duration::from_secs(self.poll_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_date_is_parsed() {
        let cli = Cli::parse_from(["diag-rollup", "-p", "PAUNIT", "-d", "08-05-2026"]);
        assert_eq!(
            cli.target_date().unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
        );
    }

    #[test]
    fn date_defaults_to_yesterday() {
        let cli = Cli::parse_from(["diag-rollup", "-p", "PAUNIT"]);
        let expected = Local::now().date_naive() - chrono::Days::new(1);
        assert_eq!(cli.target_date().unwrap(), expected);
    }

    #[test]
    fn expected_rows_wins_over_default_bytes() {
        let cli = Cli::parse_from(["diag-rollup", "-p", "PAUNIT", "--expected-rows", "600"]);
        assert_eq!(cli.threshold(), Threshold::ExpectedRows(600));

        let cli = Cli::parse_from(["diag-rollup", "-p", "PAUNIT"]);
        assert_eq!(cli.threshold(), Threshold::MinBytes(DEFAULT_MIN_BYTES));
    }

    #[test]
    fn bad_date_is_an_error() {
        let cli = Cli::parse_from(["diag-rollup", "-p", "PAUNIT", "-d", "2026-08-05"]);
        assert!(cli.target_date().is_err());
    }
}
