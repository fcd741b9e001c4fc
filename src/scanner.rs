//! The scan pipeline: discover files, run the metric battery over each file
//! in parallel, and merge records into per-metric result sets.
//!
//! Files are independent of one another, so the battery fans out across a
//! rayon pool at file granularity; all records funnel through one merge
//! point after the parallel section, so ranking and alarms never race an
//! append.

use crate::block;
use crate::config::{ScanConfig, UNICODE_SKIP_RATIO};
use crate::error::Result;
use crate::metrics::{self, Metric};
use crate::results::{MetricResultSet, ScoreRecord};
use crate::walker::{read_file, FileLocator};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything a scan produced: one result set per selected metric (battery
/// order) plus the counters for the summary line.
#[derive(Debug)]
pub struct ScanOutcome {
    pub results: Vec<MetricResultSet>,
    pub files_scanned: usize,
    pub files_ignored: usize,
    pub duration: Duration,
}

/// Runs the configured metric battery over a directory tree.
pub struct Scanner {
    config: ScanConfig,
    battery: Vec<Box<dyn Metric>>,
}

impl Scanner {
    /// Validates the configuration and compiles the battery; any bad setting
    /// or pattern is rejected here, before a single file is read.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let battery = metrics::build_battery(&config.metrics)?;
        Ok(Self { config, battery })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.battery.iter().map(|metric| metric.name()).collect()
    }

    pub fn scan(&self, root: &Path) -> Result<ScanOutcome> {
        self.scan_with_progress(root, None)
    }

    /// Like [`Scanner::scan`], updating `progress` as files complete.
    pub fn scan_with_progress(
        &self,
        root: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<ScanOutcome> {
        let started = Instant::now();

        let locator = FileLocator::from_config(&self.config)?;
        let paths = locator.discover(root)?;
        info!("discovered {} candidate files under {}", paths.len(), root.display());
        if let Some(bar) = progress {
            bar.set_length(paths.len() as u64);
        }

        let ignored = AtomicUsize::new(0);
        let per_file: Vec<Option<Vec<ScoreRecord>>> = match self.config.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| crate::error::StrayError::configuration(e.to_string()))?;
                pool.install(|| self.score_files(&paths, &ignored, progress))
            }
            None => self.score_files(&paths, &ignored, progress),
        };

        // Single merge point: every append happens here, after the fan-out.
        let mut results: Vec<MetricResultSet> = self
            .battery
            .iter()
            .map(|metric| MetricResultSet::new(metric.name(), metric.direction()))
            .collect();

        let mut files_scanned = 0;
        for records in per_file.into_iter().flatten() {
            files_scanned += 1;
            for (set, record) in results.iter_mut().zip(records) {
                set.push(record);
            }
        }

        let outcome = ScanOutcome {
            results,
            files_scanned,
            files_ignored: ignored.load(Ordering::Relaxed),
            duration: started.elapsed(),
        };
        info!(
            "scan complete: {} files scored, {} ignored in {:.2?}",
            outcome.files_scanned, outcome.files_ignored, outcome.duration
        );
        Ok(outcome)
    }

    fn score_files(
        &self,
        paths: &[PathBuf],
        ignored: &AtomicUsize,
        progress: Option<&ProgressBar>,
    ) -> Vec<Option<Vec<ScoreRecord>>> {
        paths
            .par_iter()
            .map(|path| {
                let records = self.score_file(path, ignored);
                if let Some(bar) = progress {
                    bar.inc(1);
                }
                records
            })
            .collect()
    }

    /// Run the whole battery against one file. Returns `None` when the file
    /// is unreadable or filtered, which counts it as ignored; per-file
    /// trouble never aborts the batch.
    fn score_file(&self, path: &Path, ignored: &AtomicUsize) -> Option<Vec<ScoreRecord>> {
        let data = match read_file(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("could not read {}: {e}", path.display());
                ignored.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };
        let bytes = data.as_slice();

        if self.config.skip_unicode && mostly_high_codepoints(bytes) {
            debug!("skipping unicode-heavy file: {}", path.display());
            ignored.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let path_str = path.display().to_string();
        let records = self
            .battery
            .iter()
            .map(|metric| match self.config.block_size {
                Some(block_size) => {
                    let best = block::block_score(metric.as_ref(), block_size, bytes);
                    ScoreRecord::with_position(path_str.clone(), best.value, best.position)
                }
                None => ScoreRecord::new(path_str.clone(), metric.score(bytes)),
            })
            .collect();

        Some(records)
    }
}

/// True when the bytes decode as UTF-8 and at least [`UNICODE_SKIP_RATIO`] of
/// the codepoints are above ASCII. Bytes that do not decode stay in the scan;
/// the skip targets legitimate non-English text, not binaries.
fn mostly_high_codepoints(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(text) if !text.is_empty() => {
            let total = text.chars().count();
            let high = text.chars().filter(|&c| c as u32 > 127).count();
            high as f64 / total as f64 >= UNICODE_SKIP_RATIO
        }
        _ => false,
    }
}
