//! Stray - statistical scanner for obfuscated and encrypted files.
//!
//! Stray walks a directory tree and scores every file with a battery of
//! suspiciousness metrics: Shannon entropy, index of coincidence, longest
//! token, compression ratio, and regex signature matching. Per-metric scores
//! are turned into relative rankings (or standard-deviation alarms) and
//! merged into one cumulative leaderboard, so the files that look least like
//! their neighbors float to the top. It reads, it never writes: no
//! decryption, no unpacking, no syntax awareness.
//!
//! # Example
//!
//! ```no_run
//! use stray::{Leaderboard, MetricKind, ScanConfig, Scanner};
//!
//! let config = ScanConfig {
//!     metrics: vec![MetricKind::Entropy, MetricKind::Signature],
//!     ..ScanConfig::default()
//! };
//! let mut outcome = Scanner::new(config).unwrap().scan("/srv/www".as_ref()).unwrap();
//!
//! for set in &mut outcome.results {
//!     set.rank();
//! }
//! let board = Leaderboard::from_ranked(&outcome.results);
//! for entry in board.top(10) {
//!     println!("{:>7}  {}", entry.cumulative_rank, entry.path);
//! }
//! ```

pub mod aggregate;
pub mod block;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod results;
pub mod scanner;
pub mod stats;
pub mod walker;

pub use aggregate::{Leaderboard, LeaderboardEntry};
pub use block::{block_score, BlockScore};
pub use config::ScanConfig;
pub use error::{Result, StrayError};
pub use metrics::{Direction, Metric, MetricKind, SignatureSet};
pub use results::{MetricResultSet, ScoreRecord};
pub use scanner::{ScanOutcome, Scanner};

use std::path::Path;

/// Convenience entry point: validate `config`, scan `root`, and return the
/// raw (unranked) outcome.
pub fn scan_directory<P: AsRef<Path>>(root: P, config: ScanConfig) -> Result<ScanOutcome> {
    Scanner::new(config)?.scan(root.as_ref())
}
