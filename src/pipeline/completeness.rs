// src/pipeline/completeness.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::PipelineError;

/// Sleep abstraction so the gate's retry loop is testable without real delays.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Production sleeper; blocks the (single) pipeline thread.
pub struct StdSleeper;

impl Sleeper for StdSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Which completeness check applies to this deployment. The raw file is
/// written incrementally by a remote, clock-skewed uploader, so a consumer
/// racing the writer must not mistake a partial file for a complete window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// File byte size must meet or exceed this minimum.
    MinBytes(u64),
    /// Data row count (excluding the header) must reach this count, e.g. 600
    /// for a 10-minute window at 1 Hz.
    ExpectedRows(usize),
}

/// Finite retry policy: `max_attempts` checks with a fixed poll interval
/// between them, then a terminal give-up for this run.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub poll_interval: Duration,
}

pub struct CompletenessGate<S: Sleeper> {
    threshold: Threshold,
    policy: RetryPolicy,
    sleeper: S,
}

impl<S: Sleeper> CompletenessGate<S> {
    pub fn new(threshold: Threshold, policy: RetryPolicy, sleeper: S) -> Self {
        CompletenessGate {
            threshold,
            policy,
            sleeper,
        }
    }

    /// Blocks until the file passes its completeness check, polling at the
    /// configured interval. Returns `IncompleteWindow` once the attempt cap
    /// is exhausted; the caller logs it and leaves the file for a later run.
    pub fn wait_until_complete(&self, path: &Path) -> Result<(), PipelineError> {
        let mut last_observed = 0;
        let required = self.required();

        for attempt in 1..=self.policy.max_attempts.max(1) {
            let observed = self.observe(path)?;
            if observed >= required {
                return Ok(());
            }
            last_observed = observed;
            debug!(
                "'{}' not complete (attempt {}/{}): observed {}, required {}",
                path.display(),
                attempt,
                self.policy.max_attempts,
                observed,
                required
            );
            if attempt < self.policy.max_attempts {
                self.sleeper.sleep(self.policy.poll_interval);
            }
        }

        Err(PipelineError::IncompleteWindow {
            path: path.to_path_buf(),
            observed: last_observed,
            required,
        })
    }

    fn required(&self) -> u64 {
        match self.threshold {
            Threshold::MinBytes(bytes) => bytes,
            Threshold::ExpectedRows(rows) => rows as u64,
        }
    }

    fn observe(&self, path: &Path) -> Result<u64, PipelineError> {
        match self.threshold {
            Threshold::MinBytes(_) => {
                let meta =
                    std::fs::metadata(path).map_err(|e| PipelineError::persistence(path, e))?;
                Ok(meta.len())
            }
            Threshold::ExpectedRows(_) => {
                let file = File::open(path).map_err(|e| PipelineError::persistence(path, e))?;
                let lines = BufReader::new(file).lines().count() as u64;
                // Header row does not count toward the window.
                Ok(lines.saturating_sub(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;

    /// Counts sleeps instead of performing them.
    struct FakeSleeper {
        sleeps: Cell<u32>,
    }

    impl FakeSleeper {
        fn new() -> Self {
            FakeSleeper {
                sleeps: Cell::new(0),
            }
        }
    }

    impl Sleeper for &FakeSleeper {
        fn sleep(&self, _duration: Duration) {
            self.sleeps.set(self.sleeps.get() + 1);
        }
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts: attempts,
            poll_interval: Duration::from_secs(60),
        }
    }

    #[test]
    fn short_file_exhausts_retries_without_real_sleep() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 500]).unwrap();

        let sleeper = FakeSleeper::new();
        let gate = CompletenessGate::new(Threshold::MinBytes(2000), policy(2), &sleeper);

        let err = gate.wait_until_complete(file.path()).unwrap_err();
        match err {
            PipelineError::IncompleteWindow {
                observed, required, ..
            } => {
                assert_eq!(observed, 500);
                assert_eq!(required, 2000);
            }
            other => panic!("unexpected error: {other}"),
        }
        // One sleep between the two checks, none after the last.
        assert_eq!(sleeper.sleeps.get(), 1);
    }

    #[test]
    fn complete_file_passes_on_first_check() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let sleeper = FakeSleeper::new();
        let gate = CompletenessGate::new(Threshold::MinBytes(2000), policy(2), &sleeper);

        gate.wait_until_complete(file.path()).unwrap();
        assert_eq!(sleeper.sleeps.get(), 0);
    }

    #[test]
    fn row_count_threshold_ignores_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Time,PA Current").unwrap();
        for i in 0..3 {
            writeln!(file, "08292026 10:00:0{},100.0", i).unwrap();
        }

        let sleeper = FakeSleeper::new();
        let gate = CompletenessGate::new(Threshold::ExpectedRows(3), policy(2), &sleeper);
        gate.wait_until_complete(file.path()).unwrap();

        let gate = CompletenessGate::new(Threshold::ExpectedRows(4), policy(2), &sleeper);
        assert!(gate.wait_until_complete(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_a_persistence_error() {
        let sleeper = FakeSleeper::new();
        let gate = CompletenessGate::new(Threshold::MinBytes(1), policy(1), &sleeper);
        let err = gate
            .wait_until_complete(Path::new("/nonexistent/raw.csv"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Persistence { .. }));
    }
}
