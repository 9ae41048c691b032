// src/storage.rs

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::constants::{DATE_DIR_FORMAT, FILE_DATE_FORMAT};

/// Directory-layout collaborator: resolves the raw-data directory and the
/// per-day output directory (charts + ledgers) for a platform. Resolution is
/// deterministic and idempotent; directories are created when absent.
///
/// Layout under the data root:
///   `<root>/<platform>/`                    raw uploads
///   `<root>/<platform>/<MM-DD-YYYY>/`       that day's charts and ledgers
#[derive(Debug, Clone)]
pub struct StorageLayout {
    data_root: PathBuf,
}

impl StorageLayout {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        StorageLayout {
            data_root: data_root.into(),
        }
    }

    pub fn raw_dir(&self, platform: &str) -> PathBuf {
        self.data_root.join(platform)
    }

    /// Day output directory, created if absent.
    pub fn day_dir(&self, platform: &str, date: NaiveDate) -> io::Result<PathBuf> {
        let dir = self
            .raw_dir(platform)
            .join(date.format(DATE_DIR_FORMAT).to_string());
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Structured + text ledger paths for one platform/date key. The day
    /// directory is created as a side effect.
    pub fn ledger_paths(&self, platform: &str, date: NaiveDate) -> io::Result<(PathBuf, PathBuf)> {
        let day_dir = self.day_dir(platform, date)?;
        let stem = format!("{}{}_avg", platform, date.format(FILE_DATE_FORMAT));
        Ok((
            day_dir.join(format!("{stem}.csv")),
            day_dir.join(format!("{stem}.txt")),
        ))
    }
}
