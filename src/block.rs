//! Block-wise scoring: run a metric over fixed-size slices of a file and keep
//! only the most extreme slice, to localize suspicious content inside an
//! otherwise ordinary file.

use crate::metrics::{Direction, Metric};

/// The winning block for one file: its score and the byte offset where the
/// block starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockScore {
    pub value: f64,
    pub position: u64,
}

/// Score `data` in non-overlapping `block_size` slices (the last slice may be
/// shorter) and reduce to the extremal block: the maximum when the metric's
/// direction is [`Direction::HighIsBad`], the minimum otherwise.
///
/// `block_size` must be positive; configuration validation rejects zero before
/// a scan starts. Empty data yields `{0.0, 0}` without invoking the metric.
pub fn block_score(metric: &dyn Metric, block_size: usize, data: &[u8]) -> BlockScore {
    debug_assert!(block_size > 0, "block_size validated upstream");

    if data.is_empty() {
        return BlockScore { value: 0.0, position: 0 };
    }

    let high_is_bad = metric.direction() == Direction::HighIsBad;
    let mut best = if high_is_bad { f64::NEG_INFINITY } else { f64::INFINITY };
    let mut position = 0usize;

    for (index, block) in data.chunks(block_size).enumerate() {
        let value = metric.score(block);
        // Ties: the last block wins on the high side, the first on the low.
        let better = if high_is_bad { value >= best } else { value < best };
        if better {
            best = value;
            position = index * block_size;
        }
    }

    BlockScore { value: best, position: position as u64 }
}
