//! Per-file scoring metrics.
//!
//! Each metric is a small pure function over a byte buffer plus a direction
//! flag telling the ranking and alarm layers which end of the scale is
//! suspicious. Metrics never fail on malformed input; undecodable or empty
//! data scores the neutral sentinel 0.0.

mod compression;
mod entropy;
mod language;
mod signatures;
mod tokens;

pub use compression::CompressionRatio;
pub use entropy::Entropy;
pub use language::IndexOfCoincidence;
pub use signatures::{SignatureMatch, SignatureSet};
pub use tokens::LongestToken;

use crate::error::Result;
use serde::Serialize;

/// Which end of a metric's scale marks a file as suspicious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Higher scores are more suspicious (entropy, signature hits).
    HighIsBad,
    /// Lower scores are more suspicious (index of coincidence).
    LowIsBad,
}

/// A per-file scoring algorithm.
///
/// `score` must accept any byte buffer, including an empty one, and must
/// return a finite value; decode failures map to 0.0, never to an error.
pub trait Metric: Send + Sync {
    /// Short identifier used in headers, CSV columns, and log lines.
    fn name(&self) -> &str;

    /// Fixed at construction; ranking and alarms orient themselves by it.
    fn direction(&self) -> Direction;

    fn score(&self, data: &[u8]) -> f64;
}

/// Identifiers for the built-in metrics, as selected on the configuration
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    Entropy,
    IndexOfCoincidence,
    LongestToken,
    CompressionRatio,
    Signature,
    StrictSignature,
    EvalUsage,
}

impl MetricKind {
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Entropy => "entropy",
            MetricKind::IndexOfCoincidence => "index-of-coincidence",
            MetricKind::LongestToken => "longest-token",
            MetricKind::CompressionRatio => "compression-ratio",
            MetricKind::Signature => "signature",
            MetricKind::StrictSignature => "strict-signature",
            MetricKind::EvalUsage => "eval-usage",
        }
    }

    /// Instantiate the metric. Signature variants compile their pattern sets
    /// here, so a broken pattern list is rejected before any file is scored.
    pub fn build(self) -> Result<Box<dyn Metric>> {
        Ok(match self {
            MetricKind::Entropy => Box::new(Entropy),
            MetricKind::IndexOfCoincidence => Box::new(IndexOfCoincidence),
            MetricKind::LongestToken => Box::new(LongestToken),
            MetricKind::CompressionRatio => Box::new(CompressionRatio),
            MetricKind::Signature => Box::new(SignatureMatch::new(SignatureSet::standard()?)),
            MetricKind::StrictSignature => Box::new(SignatureMatch::new(SignatureSet::strict()?)),
            MetricKind::EvalUsage => Box::new(SignatureMatch::new(SignatureSet::eval_only()?)),
        })
    }
}

/// Build the full battery for a run, preserving selection order.
pub fn build_battery(kinds: &[MetricKind]) -> Result<Vec<Box<dyn Metric>>> {
    kinds.iter().map(|kind| kind.build()).collect()
}
