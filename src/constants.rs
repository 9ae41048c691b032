// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{
    AMBER, BLUE, BROWN, CYAN, GREEN, ORANGE, PINK, PURPLE, RED, TEAL,
};
use plotters::style::RGBColor;

// Plot dimensions. Roughly the original 10x15 inch daily figure at 150 dpi.
pub const PLOT_WIDTH: u32 = 1500;
pub const PLOT_HEIGHT: u32 = 2100;

// Timestamp format used by the uploader inside raw files and in the ledger
// Time column, e.g. "08292026 10:00:00".
pub const TIMESTAMP_FORMAT: &str = "%m%d%Y %H:%M:%S";

// Date as embedded in raw/ledger file names, e.g. "08292026".
pub const FILE_DATE_FORMAT: &str = "%m%d%Y";

// Time-of-day as embedded in per-window raw file names, e.g. "100000".
pub const FILE_TIME_FORMAT: &str = "%H%M%S";

// Date as used for day directories, log file names and the CLI, e.g. "08-29-2026".
pub const DATE_DIR_FORMAT: &str = "%m-%d-%Y";

// Name of the leading timestamp column in raw files and ledgers.
pub const TIME_COLUMN: &str = "Time";

// Derived ledger column labels.
pub const TOTAL_CURRENT_LABEL: &str = "Total Current";
pub const TOTAL_POWER_LABEL: &str = "Total Power";

// Fixed-width text ledger layout: 25 chars for the Time column, 20 for
// everything else, numerics rendered with 2 decimal places.
pub const TEXT_TIME_COL_WIDTH: usize = 25;
pub const TEXT_VALUE_COL_WIDTH: usize = 20;

// Completeness gate defaults: a complete 10-minute window at 1 Hz is 600
// samples; the byte threshold is a coarse fallback for producers that pad
// or batch their uploads.
pub const DEFAULT_EXPECTED_ROWS: usize = 600;
pub const DEFAULT_MIN_BYTES: u64 = 2000;
pub const DEFAULT_POLL_SECS: u64 = 60;
pub const DEFAULT_GATE_ATTEMPTS: u32 = 2;

// The driver makes at most this many passes over the raw directory per run.
pub const MAX_SWEEPS: usize = 2;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 18;
pub const FONT_SIZE_AXIS_LABEL: i32 = 12;
pub const FONT_SIZE_LEGEND: i32 = 12;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// Series colors for single-axis panels, picked in channel order.
pub const PANEL_COLORS: [RGBColor; 8] = [PURPLE, BLUE, RED, GREEN, ORANGE, TEAL, BROWN, PINK];

// Dual-axis panels keep warm colors on the left axis (Temp, Gas) and cool
// colors on the right axis (RH, CO2) so the two scales stay visually distinct.
pub const HOT_COLORS: [RGBColor; 4] = [RED, ORANGE, PURPLE, AMBER];
pub const COLD_COLORS: [RGBColor; 3] = [BLUE, GREEN, CYAN];
