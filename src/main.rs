// src/main.rs

use std::error::Error;
use std::fs::OpenOptions;

use clap::Parser;
use log::info;

use diag_rollup::cli::Cli;
use diag_rollup::constants::DATE_DIR_FORMAT;
use diag_rollup::pipeline::completeness::{CompletenessGate, StdSleeper};
use diag_rollup::pipeline::driver;
use diag_rollup::render::plot_daily::DailyChartRenderer;
use diag_rollup::storage::StorageLayout;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let date = args
        .target_date()
        .map_err(|e| format!("invalid --date '{}': {e}", args.date.as_deref().unwrap_or("")))?;

    init_logging(&args, date)?;
    info!(
        "diag-rollup starting: platform {}, date {}",
        args.platform,
        date.format(DATE_DIR_FORMAT)
    );

    let layout = StorageLayout::new(&args.data_root);
    let gate = CompletenessGate::new(args.threshold(), args.retry_policy(), StdSleeper);

    // Per-file failures are already logged and counted inside the run; only
    // setup-level failures bubble up to a non-zero exit.
    let stats = driver::run(&args.platform, date, &layout, &gate, &DailyChartRenderer)?;
    info!(
        "done: {} processed, {} deferred, {} failed",
        stats.processed, stats.deferred, stats.failed
    );
    Ok(())
}

/// Logging is configured exactly once here and reached through the `log`
/// facade everywhere else; no component does its own logger setup. With
/// `--log-dir` the output goes to a per-day log file.
fn init_logging(args: &Cli, date: chrono::NaiveDate) -> Result<(), Box<dyn Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(log_dir) = &args.log_dir {
        std::fs::create_dir_all(log_dir)?;
        let log_path = log_dir.join(format!("{}.log", date.format(DATE_DIR_FORMAT)));
        let file = OpenOptions::new().create(true).append(true).open(log_path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
