use super::{Direction, Metric};
use crate::stats;

/// Zlib compression ratio at the default level.
///
/// Content that refuses to compress (ratio near or above 1.0) is usually
/// already compressed or encrypted; ordinary text lands well below 1.0.
#[derive(Debug, Default)]
pub struct CompressionRatio;

impl Metric for CompressionRatio {
    fn name(&self) -> &str {
        "compression-ratio"
    }

    fn direction(&self) -> Direction {
        Direction::HighIsBad
    }

    fn score(&self, data: &[u8]) -> f64 {
        stats::compression_ratio(data)
    }
}
