// src/data_input/table_reader.rs

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use log::warn;

use crate::constants::{TIMESTAMP_FORMAT, TIME_COLUMN};
use crate::data_input::sample_table::{RawSample, SampleTable};
use crate::error::PipelineError;

/// Parses one raw measurement file into a `SampleTable`.
///
/// The file is a delimited table with a header row; the first column is a
/// timestamp string in `TIMESTAMP_FORMAT`, the remaining columns are named
/// numeric channels. Rows are kept in arrival order; sorting is the
/// aggregator's/renderer's concern. An empty cell becomes NaN (a missing
/// reading); a non-empty cell that fails numeric conversion is a
/// `MalformedInput` error, as is an unparseable timestamp.
pub fn read_sample_table(path: &Path) -> Result<SampleTable, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::malformed(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let header_record = reader
        .headers()
        .map_err(|e| PipelineError::malformed(path, e))?
        .clone();

    if header_record.len() < 2 {
        return Err(PipelineError::malformed(
            path,
            format!(
                "expected a '{}' column plus at least one channel, found {} column(s)",
                TIME_COLUMN,
                header_record.len()
            ),
        ));
    }
    if header_record.get(0).map(str::trim) != Some(TIME_COLUMN) {
        warn!(
            "'{}': first column is '{}', expected '{}'; treating it as the timestamp column",
            path.display(),
            header_record.get(0).unwrap_or(""),
            TIME_COLUMN
        );
    }

    let channels: Vec<String> = header_record.iter().skip(1).map(str::to_string).collect();

    let mut rows: Vec<RawSample> = Vec::new();
    for (row_index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| PipelineError::malformed(path, e))?;

        let time_str = record.get(0).unwrap_or("");
        let timestamp = NaiveDateTime::parse_from_str(time_str, TIMESTAMP_FORMAT).map_err(|e| {
            PipelineError::malformed(
                path,
                format!("row {}: bad timestamp '{}': {}", row_index + 1, time_str, e),
            )
        })?;

        let mut values = Vec::with_capacity(channels.len());
        for col in 0..channels.len() {
            let cell = record.get(col + 1).unwrap_or("");
            if cell.is_empty() {
                values.push(f64::NAN);
            } else {
                let value: f64 = cell.parse().map_err(|_| {
                    PipelineError::malformed(
                        path,
                        format!(
                            "row {}, channel '{}': non-numeric value '{}'",
                            row_index + 1,
                            channels[col],
                            cell
                        ),
                    )
                })?;
                values.push(value);
            }
        }
        rows.push(RawSample { timestamp, values });
    }

    Ok(SampleTable { channels, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_table_in_arrival_order() {
        let file = write_temp(
            "Time,PA Current,PA Power\n\
             08292026 10:00:01,101.0,2.1\n\
             08292026 10:00:00,100.0,2.0\n",
        );
        let table = read_sample_table(file.path()).unwrap();
        assert_eq!(table.channels, vec!["PA Current", "PA Power"]);
        assert_eq!(table.len(), 2);
        // Arrival order, not time order.
        assert_eq!(table.rows[0].values, vec![101.0, 2.1]);
    }

    #[test]
    fn empty_cell_becomes_nan() {
        let file = write_temp(
            "Time,PA Current,PA Power\n\
             08292026 10:00:00,100.0,\n",
        );
        let table = read_sample_table(file.path()).unwrap();
        assert!(table.rows[0].values[1].is_nan());
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let file = write_temp(
            "Time,PA Current\n\
             08292026 10:00:00,oops\n",
        );
        let err = read_sample_table(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let file = write_temp(
            "Time,PA Current\n\
             2026-08-29T10:00:00,100.0\n",
        );
        let err = read_sample_table(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn header_only_file_parses_to_empty_table() {
        let file = write_temp("Time,PA Current\n");
        let table = read_sample_table(file.path()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_header_channels_is_malformed() {
        let file = write_temp("Time\n08292026 10:00:00\n");
        let err = read_sample_table(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }
}
