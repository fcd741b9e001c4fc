use super::{Direction, Metric};
use crate::stats;

/// Shannon entropy over the raw byte histogram.
///
/// Ciphertext, compressed archives, and packed payloads score near 8.0 while
/// plaintext source files sit around 4-5, so the high end is the suspicious
/// one. Whole-file entropy washes out small embedded payloads; pair this with
/// block mode to localize them.
#[derive(Debug, Default)]
pub struct Entropy;

impl Metric for Entropy {
    fn name(&self) -> &str {
        "entropy"
    }

    fn direction(&self) -> Direction {
        Direction::HighIsBad
    }

    fn score(&self, data: &[u8]) -> f64 {
        stats::shannon_entropy(data)
    }
}
