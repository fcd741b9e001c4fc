//! Per-metric result collection, ranking, and deviation alarms.

use crate::metrics::Direction;
use serde::Serialize;

/// One score for one file under one metric.
///
/// `rank` is filled in by ranking mode, `percentage` by alarm mode; the two
/// modes are mutually exclusive per run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord {
    pub path: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl ScoreRecord {
    pub fn new<S: Into<String>>(path: S, value: f64) -> Self {
        Self { path: path.into(), value, position: None, rank: None, percentage: None }
    }

    pub fn with_position<S: Into<String>>(path: S, value: f64, position: u64) -> Self {
        Self { path: path.into(), value, position: Some(position), rank: None, percentage: None }
    }
}

/// Ordered records for exactly one metric, with lazily recomputed statistics.
///
/// Appends are cheap and invalidate the cached mean/stddev; `rank` and
/// `flag_alarms` recompute what they need. Ranking and alarms must only run
/// after the scan's appends are complete.
#[derive(Debug, Serialize)]
pub struct MetricResultSet {
    name: String,
    direction: Direction,
    records: Vec<ScoreRecord>,
    #[serde(skip)]
    mean: f64,
    #[serde(skip)]
    stddev: f64,
    #[serde(skip)]
    stats_fresh: bool,
}

impl MetricResultSet {
    pub fn new<S: Into<String>>(name: S, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            records: Vec::new(),
            mean: 0.0,
            stddev: 0.0,
            stats_fresh: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
        self.stats_fresh = false;
    }

    /// Mean and population standard deviation over all record values.
    /// Both are 0.0 for an empty set.
    pub fn recompute_stats(&mut self) -> (f64, f64) {
        if !self.stats_fresh {
            let n = self.records.len();
            if n == 0 {
                self.mean = 0.0;
                self.stddev = 0.0;
            } else {
                let sum: f64 = self.records.iter().map(|r| r.value).sum();
                self.mean = sum / n as f64;
                let square_diffs: f64 = self
                    .records
                    .iter()
                    .map(|r| (r.value - self.mean).powi(2))
                    .sum();
                self.stddev = (square_diffs / n as f64).sqrt();
            }
            self.stats_fresh = true;
        }
        (self.mean, self.stddev)
    }

    /// Sort most-suspicious-first and assign competition ranks: tied values
    /// share a rank, and the next distinct value's rank is its 1-based
    /// position in the sorted order.
    pub fn rank(&mut self) {
        match self.direction {
            Direction::HighIsBad => self.records.sort_by(|a, b| b.value.total_cmp(&a.value)),
            Direction::LowIsBad => self.records.sort_by(|a, b| a.value.total_cmp(&b.value)),
        }

        let mut rank = 1;
        let mut prev: Option<f64> = None;
        for (index, record) in self.records.iter_mut().enumerate() {
            if let Some(prev_value) = prev {
                if prev_value != record.value {
                    rank = index + 1;
                }
            }
            record.rank = Some(rank);
            prev = Some(record.value);
        }
    }

    /// The first `count` records; meaningful after `rank`.
    pub fn top(&self, count: usize) -> &[ScoreRecord] {
        &self.records[..count.min(self.records.len())]
    }

    /// Flag records deviating from the mean by more than `threshold` standard
    /// deviations, in the suspicious direction only. Flagged records carry
    /// `percentage` (deviation in units of stddev, `+inf` when stddev is 0)
    /// and come back sorted ascending by it.
    pub fn flag_alarms(&mut self, threshold: f64) -> Vec<ScoreRecord> {
        let (mean, stddev) = self.recompute_stats();
        let direction = self.direction;

        let mut flagged = Vec::new();
        for record in &mut self.records {
            let distance = (record.value - mean).abs();
            if distance <= threshold * stddev {
                continue;
            }
            let interesting = match direction {
                Direction::HighIsBad => record.value > mean,
                Direction::LowIsBad => record.value < mean,
            };
            if interesting {
                let percentage = if stddev > 0.0 { distance / stddev } else { f64::INFINITY };
                record.percentage = Some(percentage);
                flagged.push(record.clone());
            }
        }

        flagged.sort_by(|a, b| {
            a.percentage
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.percentage.unwrap_or(f64::INFINITY))
        });
        flagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(values: &[f64], direction: Direction) -> MetricResultSet {
        let mut set = MetricResultSet::new("test", direction);
        for (i, &value) in values.iter().enumerate() {
            set.push(ScoreRecord::new(format!("file{i}"), value));
        }
        set
    }

    #[test]
    fn competition_ranking_shares_and_skips() {
        let mut set = set_with(&[5.0, 5.0, 3.0, 1.0], Direction::HighIsBad);
        set.rank();
        let ranks: Vec<usize> = set.records().iter().map(|r| r.rank.unwrap()).collect();
        assert_eq!(ranks, [1, 1, 3, 4]);
    }

    #[test]
    fn ranking_respects_direction() {
        let mut set = set_with(&[0.07, 0.01, 0.04], Direction::LowIsBad);
        set.rank();
        // Most suspicious (lowest IC) first.
        assert_eq!(set.records()[0].value, 0.01);
        assert_eq!(set.records()[0].rank, Some(1));
        assert_eq!(set.records()[2].value, 0.07);
        assert_eq!(set.records()[2].rank, Some(3));
    }

    #[test]
    fn ranking_is_stable_under_shuffled_input() {
        let mut a = set_with(&[1.0, 5.0, 3.0, 5.0], Direction::HighIsBad);
        let mut b = set_with(&[5.0, 5.0, 3.0, 1.0], Direction::HighIsBad);
        a.rank();
        b.rank();
        let ranks_a: Vec<usize> = a.records().iter().map(|r| r.rank.unwrap()).collect();
        let ranks_b: Vec<usize> = b.records().iter().map(|r| r.rank.unwrap()).collect();
        assert_eq!(ranks_a, ranks_b);
    }

    #[test]
    fn top_clamps_to_length() {
        let mut set = set_with(&[2.0, 1.0], Direction::HighIsBad);
        set.rank();
        assert_eq!(set.top(10).len(), 2);
        assert_eq!(set.top(1).len(), 1);
    }

    #[test]
    fn stats_match_population_formulas() {
        let mut set = set_with(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], Direction::HighIsBad);
        let (mean, stddev) = set.recompute_stats();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((stddev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn stats_are_refreshed_after_push() {
        let mut set = set_with(&[1.0, 3.0], Direction::HighIsBad);
        assert_eq!(set.recompute_stats().0, 2.0);
        set.push(ScoreRecord::new("late", 8.0));
        assert_eq!(set.recompute_stats().0, 4.0);
    }

    #[test]
    fn alarms_flag_high_outliers_only() {
        let mut set = set_with(&[4.0, 4.1, 3.9, 4.0, 7.9], Direction::HighIsBad);
        let flagged = set.flag_alarms(1.5);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].path, "file4");
        assert!(flagged[0].percentage.unwrap() > 1.5);
    }

    #[test]
    fn alarms_ignore_deviations_in_the_safe_direction() {
        // One very low outlier on a high-is-bad metric stays unflagged.
        let mut set = set_with(&[6.0, 6.1, 5.9, 6.0, 0.5], Direction::HighIsBad);
        let flagged = set.flag_alarms(1.5);
        assert!(flagged.is_empty());
    }

    #[test]
    fn low_is_bad_alarms_flag_low_outliers() {
        let mut set = set_with(&[0.06, 0.065, 0.062, 0.001], Direction::LowIsBad);
        let flagged = set.flag_alarms(1.5);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].path, "file3");
    }

    #[test]
    fn zero_variance_flags_nothing() {
        let mut set = set_with(&[3.0, 3.0, 3.0, 3.0], Direction::HighIsBad);
        assert!(set.flag_alarms(1.5).is_empty());
    }

    #[test]
    fn flagged_records_sort_ascending_by_deviation() {
        let mut set = set_with(
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0, 20.0],
            Direction::HighIsBad,
        );
        let flagged = set.flag_alarms(0.5);
        assert_eq!(flagged.len(), 2);
        assert!(flagged[0].percentage.unwrap() <= flagged[1].percentage.unwrap());
        assert_eq!(flagged[0].path, "file8");
        assert_eq!(flagged[1].path, "file9");
    }

    #[test]
    fn empty_set_ranks_and_alarms_quietly() {
        let mut set = MetricResultSet::new("empty", Direction::HighIsBad);
        set.rank();
        assert!(set.flag_alarms(1.5).is_empty());
        assert_eq!(set.recompute_stats(), (0.0, 0.0));
    }
}
