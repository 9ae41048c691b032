// src/pipeline/aggregate.rs

use chrono::NaiveDateTime;

use crate::data_input::sample_table::SampleTable;
use crate::error::PipelineError;

/// One aggregated record derived from a complete window of samples.
///
/// `means` is positionally aligned with `channels`. The derived totals are
/// computed row-wise first (sum of every `*Current*` / `*Power*` channel per
/// row), then averaged over the window. For uniformly sampled windows this
/// equals summing per-channel means, but the row-wise order is what the
/// historical ledgers were built with, so it is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub start_time: NaiveDateTime,
    pub channels: Vec<String>,
    pub means: Vec<f64>,
    pub total_current: f64,
    pub total_power: f64,
}

/// Computes one `WindowSummary` over the table.
///
/// Rows are sorted by timestamp (ties broken by value bits) before
/// accumulation, so the result is bit-identical for every arrival order of
/// the same rows. NaN cells are excluded from the mean's denominator
/// (standard mean semantics, not zero-filled); a channel
/// with no finite value averages to NaN. `window_start` overrides the start
/// time when the file name embeds one (stable against data gaps); otherwise
/// the earliest timestamp in the table is used.
pub fn aggregate_window(
    table: &SampleTable,
    window_start: Option<NaiveDateTime>,
) -> Result<WindowSummary, PipelineError> {
    if table.is_empty() {
        return Err(PipelineError::malformed(
            "<in-memory table>",
            "cannot aggregate an empty window",
        ));
    }

    let sorted = table.sorted_by_time();
    let channel_count = sorted.channels.len();

    let mut sums = vec![0.0f64; channel_count];
    let mut counts = vec![0usize; channel_count];

    let current_cols: Vec<usize> = sorted
        .channels
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains("Current"))
        .map(|(i, _)| i)
        .collect();
    let power_cols: Vec<usize> = sorted
        .channels
        .iter()
        .enumerate()
        .filter(|(_, name)| name.contains("Power"))
        .map(|(i, _)| i)
        .collect();

    let mut current_row_sum = 0.0f64;
    let mut current_row_count = 0usize;
    let mut power_row_sum = 0.0f64;
    let mut power_row_count = 0usize;

    for row in &sorted.rows {
        for col in 0..channel_count {
            let value = row.values.get(col).copied().unwrap_or(f64::NAN);
            if value.is_finite() {
                sums[col] += value;
                counts[col] += 1;
            }
        }

        // Row-wise derived sums; a row with no finite contribution for a
        // group is excluded from that group's denominator.
        let row_current: f64 = current_cols
            .iter()
            .filter_map(|&col| row.values.get(col))
            .filter(|v| v.is_finite())
            .sum();
        if current_cols
            .iter()
            .any(|&col| row.values.get(col).is_some_and(|v| v.is_finite()))
        {
            current_row_sum += row_current;
            current_row_count += 1;
        }

        let row_power: f64 = power_cols
            .iter()
            .filter_map(|&col| row.values.get(col))
            .filter(|v| v.is_finite())
            .sum();
        if power_cols
            .iter()
            .any(|&col| row.values.get(col).is_some_and(|v| v.is_finite()))
        {
            power_row_sum += row_power;
            power_row_count += 1;
        }
    }

    let means: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&sum, &count)| {
            if count > 0 {
                sum / count as f64
            } else {
                f64::NAN
            }
        })
        .collect();

    let total_current = if current_row_count > 0 {
        current_row_sum / current_row_count as f64
    } else {
        f64::NAN
    };
    let total_power = if power_row_count > 0 {
        power_row_sum / power_row_count as f64
    } else {
        f64::NAN
    };

    let start_time = match window_start {
        Some(start) => start,
        // Table is non-empty here, so a minimum exists.
        None => sorted.rows[0].timestamp,
    };

    Ok(WindowSummary {
        start_time,
        channels: sorted.channels,
        means,
        total_current,
        total_power,
    })
}
