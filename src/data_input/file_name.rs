// src/data_input/file_name.rs

use chrono::{NaiveDate, NaiveTime};

use crate::constants::{FILE_DATE_FORMAT, FILE_TIME_FORMAT};

/// Fields embedded in a raw file name.
///
/// Canonical grammar: `{platform}{MMDDYYYY}[_{HHMMSS}].csv`, where `platform`
/// is the longest leading run of non-digit characters. Daily rollup files omit
/// the time-of-day suffix; per-window uploads carry it. This is the single
/// place file names are parsed, replacing the character-offset slicing the
/// upstream scripts scattered (with inconsistent orderings) across components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileName {
    pub platform: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

/// Parse a raw file name (with or without its `.csv` extension). Returns
/// `None` when the name does not match the grammar.
pub fn parse_raw_file_name(name: &str) -> Option<RawFileName> {
    let stem = name.strip_suffix(".csv").unwrap_or(name);

    let digit_start = stem.find(|c: char| c.is_ascii_digit())?;
    let platform = &stem[..digit_start];
    if platform.is_empty() {
        return None;
    }

    let rest = &stem[digit_start..];
    if rest.len() < 8 || !rest[..8].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(&rest[..8], FILE_DATE_FORMAT).ok()?;

    let time = match &rest[8..] {
        "" => None,
        suffix => {
            let hms = suffix.strip_prefix('_')?;
            Some(NaiveTime::parse_from_str(hms, FILE_TIME_FORMAT).ok()?)
        }
    };

    Some(RawFileName {
        platform: platform.to_string(),
        date,
        time,
    })
}

/// File name of the daily rollup upload for one platform and date.
pub fn daily_file_name(platform: &str, date: NaiveDate) -> String {
    format!("{}{}.csv", platform, date.format(FILE_DATE_FORMAT))
}
