// src/pipeline/driver.rs

use std::path::Path;

use chrono::NaiveDate;
use log::{debug, error, info, warn};

use crate::constants::{DATE_DIR_FORMAT, MAX_SWEEPS};
use crate::data_input::file_name::parse_raw_file_name;
use crate::data_input::table_reader::read_sample_table;
use crate::error::PipelineError;
use crate::pipeline::aggregate::aggregate_window;
use crate::pipeline::completeness::{CompletenessGate, Sleeper};
use crate::pipeline::ledger::LedgerWriter;
use crate::pipeline::processed::{artifact_name, unprocessed_candidates};
use crate::render::plot_daily::ChartRenderer;
use crate::storage::StorageLayout;

/// What one run did: how many raw files were fully processed, deferred to a
/// later run (incomplete), or failed outright.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub deferred: usize,
    pub failed: usize,
}

/// One batch run for a platform and date: up to `MAX_SWEEPS` passes over the
/// raw directory, processing every candidate whose chart artifact does not
/// exist yet. Per-file failures are logged and the run moves on; only setup
/// failures (unreadable raw directory, uncreatable day directory) propagate.
pub fn run<S: Sleeper, R: ChartRenderer>(
    platform: &str,
    date: NaiveDate,
    layout: &StorageLayout,
    gate: &CompletenessGate<S>,
    renderer: &R,
) -> Result<RunStats, PipelineError> {
    let raw_dir = layout.raw_dir(platform);
    let day_dir = layout
        .day_dir(platform, date)
        .map_err(|e| PipelineError::persistence(&raw_dir, e))?;
    let (ledger_csv, ledger_txt) = layout
        .ledger_paths(platform, date)
        .map_err(|e| PipelineError::persistence(&raw_dir, e))?;
    let mut ledger = LedgerWriter::new(ledger_csv, ledger_txt);

    let mut stats = RunStats::default();
    // Files that failed hard are not retried within this run; only
    // incomplete windows get a second sweep.
    let mut failed_paths: std::collections::HashSet<std::path::PathBuf> =
        std::collections::HashSet::new();

    for sweep in 1..=MAX_SWEEPS {
        let candidates = unprocessed_candidates(&raw_dir, &day_dir)
            .map_err(|e| PipelineError::persistence(&raw_dir, e))?;
        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|path| is_for_run(path, platform, date) && !failed_paths.contains(path))
            .collect();

        if candidates.is_empty() {
            info!("sweep {sweep}: all data files for {platform} {date} processed");
            break;
        }
        info!(
            "sweep {sweep}: {} candidate file(s) for {platform} {}",
            candidates.len(),
            date.format(DATE_DIR_FORMAT)
        );

        let mut deferred_this_sweep = 0usize;
        for path in &candidates {
            match process_one(path, platform, date, &day_dir, &mut ledger, gate, renderer) {
                Ok(()) => stats.processed += 1,
                Err(PipelineError::IncompleteWindow {
                    observed, required, ..
                }) => {
                    warn!(
                        "'{}' not yet complete (observed {observed}, required {required}); \
                         deferring to a later pass",
                        path.display()
                    );
                    deferred_this_sweep += 1;
                }
                Err(e) => {
                    error!("failed to process '{}': {e}", path.display());
                    failed_paths.insert(path.clone());
                    stats.failed += 1;
                }
            }
        }

        if deferred_this_sweep == 0 {
            break;
        }
        if sweep == MAX_SWEEPS {
            stats.deferred += deferred_this_sweep;
        }
    }

    info!(
        "run complete for {platform} {}: {} processed, {} deferred, {} failed",
        date.format(DATE_DIR_FORMAT),
        stats.processed,
        stats.deferred,
        stats.failed
    );
    Ok(stats)
}

/// Full pipeline for a single raw file: gate, read, aggregate, render, append.
/// The ledger append happens only after a successful render so the artifact's
/// existence stays a faithful at-most-once marker for both outputs.
fn process_one<S: Sleeper, R: ChartRenderer>(
    path: &Path,
    platform: &str,
    date: NaiveDate,
    day_dir: &Path,
    ledger: &mut LedgerWriter,
    gate: &CompletenessGate<S>,
    renderer: &R,
) -> Result<(), PipelineError> {
    gate.wait_until_complete(path)?;

    let table = read_sample_table(path)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    // Window start from the name-embedded time when present (stable against
    // data gaps); the aggregator falls back to the earliest sample otherwise.
    let window_start = parse_raw_file_name(file_name)
        .and_then(|parsed| parsed.time.map(|t| parsed.date.and_time(t)));
    let summary = aggregate_window(&table, window_start)?;

    let heading = format!("{platform} Data From {}", date.format(DATE_DIR_FORMAT));
    let artifact_path = day_dir.join(artifact_name(file_name));
    renderer.render(&table, &heading, &artifact_path)?;
    debug!("chart saved as '{}'", artifact_path.display());

    ledger.append(&summary)?;
    Ok(())
}

/// Candidates are matched to the run's platform/date by their parsed file
/// name; files that do not follow the grammar are skipped with a log line.
fn is_for_run(path: &Path, platform: &str, date: NaiveDate) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    match parse_raw_file_name(name) {
        Some(parsed) => parsed.platform == platform && parsed.date == date,
        None => {
            debug!("skipping '{name}': does not match the raw file-name grammar");
            false
        }
    }
}
