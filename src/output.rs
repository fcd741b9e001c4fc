//! Output formatting and reporting.
//!
//! The scoring engine hands over plain data; everything presentational lives
//! here: top-K console tables, the cumulative leaderboard, the scan summary,
//! CSV export of the raw score matrix, and the JSON report.

use crate::aggregate::{Leaderboard, LeaderboardEntry};
use crate::error::Result;
use crate::results::{MetricResultSet, ScoreRecord};
use crate::scanner::ScanOutcome;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Machine-readable report covering one whole run.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub files_scanned: usize,
    pub files_ignored: usize,
    pub duration_ms: u64,
    pub metrics: Vec<MetricReport<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaderboard: Option<&'a [LeaderboardEntry]>,
}

/// One metric's contribution to the JSON report. In ranking mode `records`
/// is the full ranked list; in alarm mode it is the flagged outliers.
#[derive(Debug, Serialize)]
pub struct MetricReport<'a> {
    pub name: &'a str,
    pub records: &'a [ScoreRecord],
}

pub fn format_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| {
        crate::error::StrayError::configuration(format!("JSON serialization failed: {e}"))
    })
}

/// Top-K table for one ranked metric.
pub fn format_ranked(set: &MetricResultSet, top: usize, block_mode: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n[[ Top {} {} results ]]",
        top.min(set.len()),
        set.name().bold()
    );

    if set.is_empty() {
        out.push_str("  no results\n");
        return out;
    }

    if block_mode {
        out.push_str("  Value      Position         Filename\n");
        out.push_str("  -----      --------         --------\n");
    } else {
        out.push_str("  Value          Filename\n");
        out.push_str("  -----          --------\n");
    }

    for record in set.top(top) {
        if block_mode {
            let _ = writeln!(
                out,
                "  {:>8.4}   at byte {:<8}  {}",
                record.value,
                record.position.unwrap_or(0),
                record.path
            );
        } else {
            let _ = writeln!(out, "  {:>8.4}       {}", record.value, record.path);
        }
    }

    out
}

/// Flagged-outlier table for one metric in alarm mode.
pub fn format_alarms(name: &str, flagged: &[ScoreRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n[[ Flagged files for {} ]]", name.bold());

    if flagged.is_empty() {
        out.push_str("  no outliers\n");
        return out;
    }

    out.push_str("  Deviation     Value          Filename\n");
    out.push_str("  ---------     -----          --------\n");
    for record in flagged {
        let deviation = record.percentage.unwrap_or(f64::INFINITY);
        let deviation = if deviation.is_finite() {
            format!("{deviation:>8.2}σ")
        } else {
            format!("{:>9}", "inf")
        };
        let _ = writeln!(out, "  {}     {:>8.4}       {}", deviation, record.value, record.path);
    }

    out
}

pub fn format_leaderboard(board: &Leaderboard, top: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "[[ Top cumulative ranked files ]]".bold());

    if board.is_empty() {
        out.push_str("  no results\n");
        return out;
    }

    for entry in board.top(top) {
        let _ = writeln!(out, "  {:>7}        {}", entry.cumulative_rank, entry.path);
    }

    out
}

pub fn format_summary(outcome: &ScanOutcome) -> String {
    format!(
        "\n[[ Total files scanned: {} ]]\n[[ Total files ignored: {} ]]\n[[ Scan time: {:.2} seconds ]]\n",
        outcome.files_scanned,
        outcome.files_ignored,
        outcome.duration.as_secs_f64()
    )
}

/// Write the raw per-file score matrix: one row per file, one value column
/// per metric, plus a position column per metric in block mode. Must run
/// before ranking, which reorders the records.
pub fn write_csv(
    path: &Path,
    sets: &[MetricResultSet],
    block_mode: bool,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["filename".to_string()];
    for set in sets {
        header.push(set.name().to_string());
        if block_mode {
            header.push("position".to_string());
        }
    }
    writer.write_record(&header)?;

    let row_count = sets.first().map_or(0, |set| set.len());
    for row in 0..row_count {
        let mut fields = vec![sets[0].records()[row].path.clone()];
        for set in sets {
            let record = &set.records()[row];
            fields.push(record.value.to_string());
            if block_mode {
                fields.push(record.position.unwrap_or(0).to_string());
            }
        }
        writer.write_record(&fields)?;
    }

    writer.flush().map_err(crate::error::StrayError::Io)?;
    Ok(())
}
