// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, PLOT_HEIGHT, PLOT_WIDTH,
};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Formats an x value of seconds-since-midnight as HH:MM for axis labels.
pub fn format_time_of_day(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", (total / 3600) % 24, (total / 60) % 60)
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// One y axis of a panel: its label, range and the series drawn against it.
#[derive(Clone)]
pub struct AxisSide {
    pub y_label: String,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
}

/// One panel of the stacked figure. `right` carries the secondary y axis for
/// the fixed dual-axis pairings (Temp/RH, Gas/CO2).
#[derive(Clone)]
pub struct PanelConfig {
    pub title: String,
    pub left: AxisSide,
    pub right: Option<AxisSide>,
}

impl PanelConfig {
    fn has_data(&self) -> bool {
        let left = self.left.series.iter().any(|s| !s.data.is_empty());
        let right = self
            .right
            .as_ref()
            .map(|side| side.series.iter().any(|s| !s.data.is_empty()))
            .unwrap_or(false);
        left || right
    }
}

/// Draw a "Data Unavailable" message on a panel area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    panel_title: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{panel_title} Data Unavailable: {reason}");
    let estimated_text_width = (message.len() as i32) * FONT_SIZE_MESSAGE / 2;
    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - FONT_SIZE_MESSAGE / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, (center_x.max(0), center_y), text_style))?;
    Ok(())
}

fn legend_entry(color: RGBColor) -> impl Fn((i32, i32)) -> PathElement<(i32, i32)> {
    move |(x, y)| {
        PathElement::new(
            vec![(x, y), (x + 20, y)],
            color.stroke_width(LINE_WIDTH_LEGEND),
        )
    }
}

/// Draws one single-axis panel.
fn draw_single_axis_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    panel: &PanelConfig,
    x_range: Range<f64>,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, panel.left.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc(&panel.left.y_label)
        .x_labels(12)
        .y_labels(5)
        .x_label_formatter(&|x| format_time_of_day(*x))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_count = 0;
    for s in &panel.left.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.data.iter().cloned(),
                color.stroke_width(s.stroke_width),
            ))?
            .label(&s.label)
            .legend(legend_entry(color));
        legend_count += 1;
    }

    if legend_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }
    Ok(())
}

/// Draws one dual-axis panel (e.g. Temp on the left axis, RH on the right).
fn draw_dual_axis_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    panel: &PanelConfig,
    right: &AxisSide,
    x_range: Range<f64>,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), panel.left.y_range.clone())?
        .set_secondary_coord(x_range, right.y_range.clone());

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc(&panel.left.y_label)
        .x_labels(12)
        .y_labels(5)
        .x_label_formatter(&|x| format_time_of_day(*x))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(&right.y_label)
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_count = 0;
    for s in &panel.left.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.data.iter().cloned(),
                color.stroke_width(s.stroke_width),
            ))?
            .label(&s.label)
            .legend(legend_entry(color));
        legend_count += 1;
    }
    for s in &right.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        chart
            .draw_secondary_series(LineSeries::new(
                s.data.iter().cloned(),
                color.stroke_width(s.stroke_width),
            ))?
            .label(&s.label)
            .legend(legend_entry(color));
        legend_count += 1;
    }

    if legend_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }
    Ok(())
}

/// Creates one stacked figure with a shared x axis: one row per panel, panel
/// count varying with the channels the unit actually carries.
pub fn draw_stacked_panels(
    output_path: &Path,
    heading: &str,
    panels: &[PanelConfig],
    x_range: Range<f64>,
) -> Result<(), Box<dyn Error>> {
    if panels.is_empty() {
        return Err("no panels to draw".into());
    }

    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        heading,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((panels.len(), 1));

    for (panel, area) in panels.iter().zip(sub_plot_areas.iter()) {
        let valid_range = x_range.end > x_range.start
            && panel.left.y_range.end > panel.left.y_range.start
            && panel
                .right
                .as_ref()
                .map(|side| side.y_range.end > side.y_range.start)
                .unwrap_or(true);

        if panel.has_data() && valid_range {
            match &panel.right {
                Some(right) => draw_dual_axis_panel(area, panel, right, x_range.clone())?,
                None => draw_single_axis_panel(area, panel, x_range.clone())?,
            }
        } else {
            let reason = if !panel.has_data() {
                "No data points"
            } else {
                "Invalid ranges"
            };
            draw_unavailable_message(area, &panel.title, reason)?;
        }
    }

    root_area.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_range_pads_and_orders() {
        let (min, max) = calculate_range(0.0, 100.0);
        assert_eq!(min, -15.0);
        assert_eq!(max, 115.0);

        // Reversed inputs are reordered.
        let (min, max) = calculate_range(100.0, 0.0);
        assert!(min < max);

        // Degenerate range gets a fixed pad.
        let (min, max) = calculate_range(5.0, 5.0);
        assert_eq!(min, 4.5);
        assert_eq!(max, 5.5);
    }

    #[test]
    fn time_of_day_labels() {
        assert_eq!(format_time_of_day(0.0), "00:00");
        assert_eq!(format_time_of_day(36_000.0), "10:00");
        assert_eq!(format_time_of_day(36_599.0), "10:09");
        assert_eq!(format_time_of_day(86_340.0), "23:59");
    }
}
