// src/render/plot_daily.rs

use std::path::{Path, PathBuf};

use chrono::Timelike;
use log::warn;

use crate::constants::{COLD_COLORS, HOT_COLORS, LINE_WIDTH_PLOT, PANEL_COLORS};
use crate::data_input::sample_table::SampleTable;
use crate::error::PipelineError;
use crate::plot_framework::{calculate_range, draw_stacked_panels, AxisSide, PanelConfig, PlotSeries};
use crate::render::channel_groups::{plan_panels, PanelKind};

/// Boundary the driver renders through. A trait for the same reason the
/// completeness gate sleeps through one: the run loop can then be exercised
/// end to end with a stub that just drops the artifact file, instead of a
/// bitmap backend that needs system fonts.
pub trait ChartRenderer {
    fn render(
        &self,
        table: &SampleTable,
        heading: &str,
        output_path: &Path,
    ) -> Result<(), PipelineError>;
}

/// Production renderer: the stacked daily figure.
pub struct DailyChartRenderer;

impl ChartRenderer for DailyChartRenderer {
    fn render(
        &self,
        table: &SampleTable,
        heading: &str,
        output_path: &Path,
    ) -> Result<(), PipelineError> {
        render_daily_chart(table, heading, output_path)
    }
}

/// Renders one multi-panel chart for a sample table.
///
/// Channels are routed to panels by the fixed grouping rules; panels with no
/// matching channel are omitted. The figure is written to a temporary sibling
/// path and renamed into place only after a fully successful render, so a
/// plotting failure never leaves a partial artifact that would satisfy the
/// processed check on the next run. Never panics past this boundary; any
/// plotting failure comes back as a `Render` error for the caller to log.
pub fn render_daily_chart(
    table: &SampleTable,
    heading: &str,
    output_path: &Path,
) -> Result<(), PipelineError> {
    let panels_plan = plan_panels(&table.channels);
    if panels_plan.is_empty() {
        return Err(PipelineError::render(
            output_path,
            "no channel matched any panel group",
        ));
    }

    let sorted = table.sorted_by_time();
    if sorted.is_empty() {
        return Err(PipelineError::render(output_path, "table has no rows"));
    }

    // Shared x axis: seconds since midnight of each sample.
    let times: Vec<f64> = sorted
        .rows
        .iter()
        .map(|row| row.timestamp.time().num_seconds_from_midnight() as f64)
        .collect();
    let x_min = times.first().copied().unwrap_or(0.0);
    let x_max = times.last().copied().unwrap_or(0.0);
    let x_range = if x_max > x_min {
        x_min..x_max
    } else {
        x_min..x_min + 1.0
    };

    let series_for = |col: usize, color| -> PlotSeries {
        let data: Vec<(f64, f64)> = sorted
            .column(col)
            .zip(times.iter())
            .filter(|(v, _)| v.is_finite())
            .map(|(v, &t)| (t, v))
            .collect();
        PlotSeries {
            data,
            label: sorted.channels[col].clone(),
            color,
            stroke_width: LINE_WIDTH_PLOT,
        }
    };

    let side_for = |cols: &[usize], palette: &[plotters::style::RGBColor], label: &str| -> AxisSide {
        let series: Vec<PlotSeries> = cols
            .iter()
            .enumerate()
            .map(|(i, &col)| series_for(col, palette[i % palette.len()]))
            .collect();
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for s in &series {
            for &(_, v) in &s.data {
                y_min = y_min.min(v);
                y_max = y_max.max(v);
            }
        }
        let y_range = if y_min.is_finite() {
            let (lo, hi) = calculate_range(y_min, y_max);
            lo..hi
        } else {
            0.0..1.0
        };
        AxisSide {
            y_label: label.to_string(),
            y_range,
            series,
        }
    };

    let mut panels: Vec<PanelConfig> = Vec::with_capacity(panels_plan.len());
    for plan in &panels_plan {
        let panel = match plan.kind {
            PanelKind::Single(group) => PanelConfig {
                title: group.y_label().to_string(),
                left: side_for(&plan.left_channels, &PANEL_COLORS, group.y_label()),
                right: None,
            },
            PanelKind::Dual { left, right } => PanelConfig {
                title: format!("{} / {}", left.y_label(), right.y_label()),
                left: side_for(&plan.left_channels, &HOT_COLORS, left.y_label()),
                right: Some(side_for(&plan.right_channels, &COLD_COLORS, right.y_label())),
            },
        };
        panels.push(panel);
    }

    let tmp_path = temp_sibling(output_path);
    if let Err(e) = draw_stacked_panels(&tmp_path, heading, &panels, x_range) {
        remove_partial(&tmp_path);
        return Err(PipelineError::render(output_path, e.to_string()));
    }
    if let Err(e) = std::fs::rename(&tmp_path, output_path) {
        remove_partial(&tmp_path);
        return Err(PipelineError::render(output_path, e));
    }
    Ok(())
}

/// Temporary render destination next to the final artifact, on the same
/// filesystem so the final rename is atomic.
fn temp_sibling(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".to_string());
    name.push_str(".tmp.png");
    output_path.with_file_name(name)
}

fn remove_partial(tmp_path: &Path) {
    if tmp_path.exists() {
        if let Err(e) = std::fs::remove_file(tmp_path) {
            warn!(
                "could not remove partial render '{}': {}",
                tmp_path.display(),
                e
            );
        }
    }
}
