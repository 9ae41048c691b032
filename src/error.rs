// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Error taxonomy for the rollup pipeline. Each variant carries the file it
/// relates to so a failure logged mid-sweep can be traced back to its input.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raw file could not be parsed as a delimited table, or a non-empty cell
    /// failed numeric/timestamp conversion. Not retried within a run.
    #[error("malformed input '{}': {source}", .path.display())]
    MalformedInput { path: PathBuf, source: Cause },

    /// File exists but has not yet reached the completeness threshold after
    /// the gate exhausted its attempts. Transient; a later run retries it.
    #[error(
        "incomplete window '{}': observed {observed}, required {required}",
        .path.display()
    )]
    IncompleteWindow {
        path: PathBuf,
        observed: u64,
        required: u64,
    },

    /// The plotting collaborator failed. No artifact is left behind, so the
    /// file stays eligible for a future run.
    #[error("render failed for '{}': {source}", .path.display())]
    Render { path: PathBuf, source: Cause },

    /// Ledger destination could not be opened or written. The in-memory
    /// summary for that window is lost for this run.
    #[error("persistence failure at '{}': {source}", .path.display())]
    Persistence { path: PathBuf, source: Cause },
}

impl PipelineError {
    pub fn malformed(path: impl Into<PathBuf>, cause: impl Into<Cause>) -> Self {
        PipelineError::MalformedInput {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub fn render(path: impl Into<PathBuf>, cause: impl Into<Cause>) -> Self {
        PipelineError::Render {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, cause: impl Into<Cause>) -> Self {
        PipelineError::Persistence {
            path: path.into(),
            source: cause.into(),
        }
    }
}
