//! Cross-metric aggregation: merge per-metric ranks into one leaderboard.

use crate::results::MetricResultSet;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// One leaderboard row. A lower cumulative rank means the file scored
/// suspicious across more of the selected metrics.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub path: String,
    pub cumulative_rank: usize,
}

/// Cumulative rank sums across all ranked metrics, sorted ascending.
///
/// Built once after every result set has been ranked; the aggregator works on
/// ranks alone and never sees metric values or directions. Every metric
/// scores every file (decode failures become sentinels, not absences), so
/// each path accumulates one rank per metric.
#[derive(Debug, Default, Serialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn from_ranked(sets: &[MetricResultSet]) -> Self {
        let mut sums: FxHashMap<String, usize> = FxHashMap::default();

        for set in sets {
            for record in set.records() {
                if let Some(rank) = record.rank {
                    *sums.entry(record.path.clone()).or_insert(0) += rank;
                }
            }
        }

        let mut entries: Vec<LeaderboardEntry> = sums
            .into_iter()
            .map(|(path, cumulative_rank)| LeaderboardEntry { path, cumulative_rank })
            .collect();
        // Path tie-break keeps output deterministic across runs.
        entries.sort_by(|a, b| {
            a.cumulative_rank
                .cmp(&b.cumulative_rank)
                .then_with(|| a.path.cmp(&b.path))
        });

        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn top(&self, count: usize) -> &[LeaderboardEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
