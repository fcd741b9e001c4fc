use super::{Direction, Metric};
use crate::error::{Result, StrayError};
use regex::Regex;

/// Patterns for the standard signature set: common building blocks of
/// encoded-payload loaders and dynamic execution.
pub const STANDARD_PATTERNS: &[&str] = &[
    r"chr\(.*?\)",
    r"base64",
    r"eval\(",
    r"exec\(",
    r"str\.replace",
    r"\\x[0-9a-fA-F]{2}",
];

/// Patterns for the strict set: idioms that rarely appear outside webshells,
/// weighted double when scoring.
pub const STRICT_PATTERNS: &[&str] = &[
    r"system\(",
    r"shell_exec",
    r"passthru\(",
    r"eval\(base64_decode",
    r"assert\(",
    r"preg_replace.*/e",
];

/// The narrow eval-only set.
pub const EVAL_PATTERNS: &[&str] = &[r"eval\s*\("];

/// A named, weighted list of compiled dangerous-call patterns.
///
/// The lists and weights are data, not logic: a scan can swap in a custom set
/// without touching the scoring engine.
#[derive(Debug, Clone)]
pub struct SignatureSet {
    name: String,
    weight: f64,
    patterns: Vec<Regex>,
}

impl SignatureSet {
    /// Compile a custom set. A pattern that fails to compile rejects the whole
    /// set before any file is scored.
    pub fn new<S: Into<String>>(name: S, weight: f64, patterns: &[&str]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .map_err(|e| StrayError::invalid_signature(*pattern, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name: name.into(), weight, patterns: compiled })
    }

    pub fn standard() -> Result<Self> {
        Self::new("signature", 1.0, STANDARD_PATTERNS)
    }

    pub fn strict() -> Result<Self> {
        Self::new("strict-signature", 2.0, STRICT_PATTERNS)
    }

    pub fn eval_only() -> Result<Self> {
        Self::new("eval-usage", 1.0, EVAL_PATTERNS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Counts non-overlapping matches across a [`SignatureSet`], scaled by the
/// set's weight. Undecodable bytes are decoded lossily, so binary garbage
/// scores whatever survives the decode rather than erroring out.
#[derive(Debug)]
pub struct SignatureMatch {
    set: SignatureSet,
}

impl SignatureMatch {
    pub fn new(set: SignatureSet) -> Self {
        Self { set }
    }
}

impl Metric for SignatureMatch {
    fn name(&self) -> &str {
        self.set.name()
    }

    fn direction(&self) -> Direction {
        Direction::HighIsBad
    }

    fn score(&self, data: &[u8]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }

        let text = String::from_utf8_lossy(data);
        let hits: usize = self
            .set
            .patterns
            .iter()
            .map(|pattern| pattern.find_iter(&text).count())
            .sum();

        hits as f64 * self.set.weight
    }
}
