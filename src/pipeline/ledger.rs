// src/pipeline/ledger.rs

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::constants::{
    TEXT_TIME_COL_WIDTH, TEXT_VALUE_COL_WIDTH, TIMESTAMP_FORMAT, TIME_COLUMN,
    TOTAL_CURRENT_LABEL, TOTAL_POWER_LABEL,
};
use crate::error::PipelineError;
use crate::pipeline::aggregate::WindowSummary;

/// Appends window summaries to the two ledger representations for one
/// platform/date key: a structured CSV and a fixed-width text mirror.
///
/// On the first append for a key, both files are created and the fixed header
/// row is written once; every later append adds exactly one data row to each,
/// never re-reading or rewriting prior rows. The caller is responsible for
/// feeding every append the same channel-to-column mapping; single writer per
/// key is assumed (overlapping invocations need external locking).
pub struct LedgerWriter {
    csv_path: PathBuf,
    txt_path: PathBuf,
    expected_values: Option<usize>,
}

impl LedgerWriter {
    pub fn new(csv_path: impl Into<PathBuf>, txt_path: impl Into<PathBuf>) -> Self {
        LedgerWriter {
            csv_path: csv_path.into(),
            txt_path: txt_path.into(),
            expected_values: None,
        }
    }

    /// The first append of this writer fixes the expected channel count; a
    /// later summary with a different count (a unit changing its sensor set
    /// mid-run) would silently misalign the ledger columns, so it is
    /// rejected before anything is written.
    pub fn append(&mut self, summary: &WindowSummary) -> Result<(), PipelineError> {
        match self.expected_values {
            None => self.expected_values = Some(summary.means.len()),
            Some(expected) if expected != summary.means.len() => {
                return Err(PipelineError::persistence(
                    &self.csv_path,
                    format!(
                        "channel count changed mid-run: expected {expected} value column(s), got {}",
                        summary.means.len()
                    ),
                ));
            }
            Some(_) => {}
        }

        self.append_csv(summary)?;
        self.append_txt(summary)?;
        info!(
            "ledger '{}': appended window starting {}",
            self.csv_path.display(),
            summary.start_time.format(TIMESTAMP_FORMAT)
        );
        Ok(())
    }

    fn append_csv(&self, summary: &WindowSummary) -> Result<(), PipelineError> {
        let write_header = !self.csv_path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| PipelineError::persistence(&self.csv_path, e))?;
        let mut writer = csv::Writer::from_writer(file);

        if write_header {
            let mut header: Vec<&str> = Vec::with_capacity(summary.channels.len() + 3);
            header.push(TIME_COLUMN);
            header.extend(summary.channels.iter().map(String::as_str));
            header.push(TOTAL_CURRENT_LABEL);
            header.push(TOTAL_POWER_LABEL);
            writer
                .write_record(&header)
                .map_err(|e| PipelineError::persistence(&self.csv_path, e))?;
        }

        let mut row: Vec<String> = Vec::with_capacity(summary.means.len() + 3);
        row.push(summary.start_time.format(TIMESTAMP_FORMAT).to_string());
        row.extend(summary.means.iter().map(|v| v.to_string()));
        row.push(summary.total_current.to_string());
        row.push(summary.total_power.to_string());
        writer
            .write_record(&row)
            .map_err(|e| PipelineError::persistence(&self.csv_path, e))?;
        writer
            .flush()
            .map_err(|e| PipelineError::persistence(&self.csv_path, e))?;
        Ok(())
    }

    fn append_txt(&self, summary: &WindowSummary) -> Result<(), PipelineError> {
        let write_header = !self.txt_path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.txt_path)
            .map_err(|e| PipelineError::persistence(&self.txt_path, e))?;

        if write_header {
            let mut header = format!("{:<width$}", TIME_COLUMN, width = TEXT_TIME_COL_WIDTH);
            for name in &summary.channels {
                header.push_str(&format!("{:<width$}", name, width = TEXT_VALUE_COL_WIDTH));
            }
            header.push_str(&format!(
                "{:<width$}",
                TOTAL_CURRENT_LABEL,
                width = TEXT_VALUE_COL_WIDTH
            ));
            header.push_str(&format!(
                "{:<width$}",
                TOTAL_POWER_LABEL,
                width = TEXT_VALUE_COL_WIDTH
            ));
            writeln!(file, "{}", header.trim_end())
                .map_err(|e| PipelineError::persistence(&self.txt_path, e))?;
        }

        let mut line = format!(
            "{:<width$}",
            summary.start_time.format(TIMESTAMP_FORMAT).to_string(),
            width = TEXT_TIME_COL_WIDTH
        );
        for value in &summary.means {
            line.push_str(&format!("{:<width$.2}", value, width = TEXT_VALUE_COL_WIDTH));
        }
        line.push_str(&format!(
            "{:<width$.2}",
            summary.total_current,
            width = TEXT_VALUE_COL_WIDTH
        ));
        line.push_str(&format!(
            "{:<width$.2}",
            summary.total_power,
            width = TEXT_VALUE_COL_WIDTH
        ));
        writeln!(file, "{}", line.trim_end())
            .map_err(|e| PipelineError::persistence(&self.txt_path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary(minute: u32) -> WindowSummary {
        WindowSummary {
            start_time: NaiveDate::from_ymd_opt(2026, 8, 29)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
            channels: vec!["PA Current".to_string(), "PA Power".to_string()],
            means: vec![100.0 + minute as f64, 2.0],
            total_current: 100.0 + minute as f64,
            total_power: 2.0,
        }
    }

    #[test]
    fn header_written_exactly_once_across_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LedgerWriter::new(dir.path().join("l.csv"), dir.path().join("l.txt"));

        for minute in [0, 10, 20] {
            writer.append(&summary(minute)).unwrap();
        }

        let csv = std::fs::read_to_string(dir.path().join("l.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Time,PA Current,PA Power,Total Current,Total Power"
        );
        assert!(lines[1].starts_with("08292026 10:00:00,100,2"));
        assert!(lines[3].starts_with("08292026 10:20:00,120,2"));

        let txt = std::fs::read_to_string(dir.path().join("l.txt")).unwrap();
        let txt_lines: Vec<&str> = txt.lines().collect();
        assert_eq!(txt_lines.len(), 4);
        assert!(txt_lines[0].starts_with("Time"));
        assert_eq!(
            txt_lines.iter().filter(|l| l.starts_with("Time")).count(),
            1
        );
    }

    #[test]
    fn text_mirror_uses_fixed_width_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LedgerWriter::new(dir.path().join("l.csv"), dir.path().join("l.txt"));
        writer.append(&summary(0)).unwrap();

        let txt = std::fs::read_to_string(dir.path().join("l.txt")).unwrap();
        let data_line = txt.lines().nth(1).unwrap();
        // Time column is 25 wide, then each value column 20 wide.
        assert_eq!(&data_line[..TEXT_TIME_COL_WIDTH], "08292026 10:00:00        ");
        assert!(data_line[TEXT_TIME_COL_WIDTH..].starts_with("100.00"));
        let second_value_col = TEXT_TIME_COL_WIDTH + TEXT_VALUE_COL_WIDTH;
        assert!(data_line[second_value_col..].starts_with("2.00"));
    }

    #[test]
    fn channel_count_drift_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LedgerWriter::new(dir.path().join("l.csv"), dir.path().join("l.txt"));
        writer.append(&summary(0)).unwrap();

        let mut drifted = summary(10);
        drifted.channels.push("Temp_1".to_string());
        drifted.means.push(25.0);
        let err = writer.append(&drifted).unwrap_err();
        assert!(matches!(err, PipelineError::Persistence { .. }));

        // The misaligned row never reached either representation.
        let csv = std::fs::read_to_string(dir.path().join("l.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2);
        let txt = std::fs::read_to_string(dir.path().join("l.txt")).unwrap();
        assert_eq!(txt.lines().count(), 2);

        // A matching summary still appends normally afterwards.
        writer.append(&summary(20)).unwrap();
        let csv = std::fs::read_to_string(dir.path().join("l.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn unwritable_destination_is_a_persistence_error() {
        let mut writer = LedgerWriter::new("/nonexistent/dir/l.csv", "/nonexistent/dir/l.txt");
        let err = writer.append(&summary(0)).unwrap_err();
        assert!(matches!(err, PipelineError::Persistence { .. }));
    }
}
