// src/pipeline/processed.rs

use std::io;
use std::path::{Path, PathBuf};

/// Expected chart artifact name for a raw file: extension replaced with png.
pub fn artifact_name(raw_name: &str) -> String {
    match raw_name.rsplit_once('.') {
        Some((stem, _ext)) => format!("{stem}.png"),
        None => format!("{raw_name}.png"),
    }
}

/// Whether a raw file already has its chart artifact at the rendering
/// destination. Presence only: a corrupted prior artifact still counts as
/// processed and is never regenerated automatically.
pub fn is_processed(raw_name: &str, plot_dir: &Path) -> bool {
    plot_dir.join(artifact_name(raw_name)).exists()
}

/// Lists raw `.csv` files in `raw_dir` that have no artifact in `plot_dir`,
/// sorted by name so windowed uploads come back in chronological order.
pub fn unprocessed_candidates(raw_dir: &Path, plot_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(raw_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !is_processed(&name, plot_dir) {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}
