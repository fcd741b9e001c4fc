//! Scan configuration with validation and defaults.
//!
//! Nothing in the scoring engine reads process-wide state; every knob is
//! carried here and threaded through explicitly. Invalid settings are
//! rejected up front, before any file is touched.

use crate::error::{Result, StrayError};
use crate::metrics::MetricKind;
use regex::Regex;

/// Files must be strictly larger than this to be scanned.
pub const SMALLEST_FILE_SIZE: u64 = 1;

/// Default deviation threshold for alarm mode.
pub const DEFAULT_ALARM_THRESHOLD: f64 = 1.5;

/// Default number of rows shown per metric and on the leaderboard.
pub const DEFAULT_TOP_COUNT: usize = 10;

/// A file whose decoded text is at least this fraction high codepoints is
/// skipped under `skip_unicode`.
pub const UNICODE_SKIP_RATIO: f64 = 0.1;

/// Configuration surface consumed by the scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Metrics to run, in battery order.
    pub metrics: Vec<MetricKind>,
    /// Score fixed-size blocks instead of whole files when set.
    pub block_size: Option<usize>,
    /// Switch from ranking to alarm mode at this deviation threshold.
    pub alarm_threshold: Option<f64>,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Basename filter; only matching files are scanned.
    pub filename_filter: String,
    /// Files at or below this size are ignored.
    pub min_file_size: u64,
    /// Skip files that decode to mostly non-ASCII text.
    pub skip_unicode: bool,
    /// Rows shown per metric and on the leaderboard.
    pub top_count: usize,
    /// Worker threads; `None` uses the rayon default (core count).
    pub jobs: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            block_size: None,
            alarm_threshold: None,
            follow_symlinks: false,
            filename_filter: ".*".to_string(),
            min_file_size: SMALLEST_FILE_SIZE,
            skip_unicode: false,
            top_count: DEFAULT_TOP_COUNT,
            jobs: None,
        }
    }
}

impl ScanConfig {
    /// Reject bad settings before any file is processed.
    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(StrayError::configuration("no metrics selected"));
        }

        if let Some(block_size) = self.block_size {
            if block_size == 0 {
                return Err(StrayError::configuration("block size must be greater than 0"));
            }
        }

        if let Some(threshold) = self.alarm_threshold {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(StrayError::configuration(
                    "alarm threshold must be a positive, finite number",
                ));
            }
        }

        if self.top_count == 0 {
            return Err(StrayError::configuration("top count must be greater than 0"));
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err(StrayError::configuration("worker count must be greater than 0"));
            }
        }

        self.compile_filter().map(|_| ())
    }

    /// Compile the basename filter, mapping bad patterns to a configuration
    /// error.
    pub fn compile_filter(&self) -> Result<Regex> {
        Regex::new(&self.filename_filter)
            .map_err(|e| StrayError::invalid_filter(&self.filename_filter, e.to_string()))
    }
}
