use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::Path;
use stray::{cli, output, Leaderboard, Scanner};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // RUST_LOG wins over the verbose flag when both are present.
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("stray=debug")
    } else {
        EnvFilter::new("stray=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    debug!("logging initialized (verbose={})", args.verbose);

    // Status goes to stderr; stdout carries only the report.
    eprintln!("stray v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("statistical scanner for obfuscated and encrypted files\n");

    let config = args.to_config();
    let scanner = Scanner::new(config).context("invalid scan configuration")?;

    let progress = if !args.json && std::io::stdout().is_terminal() {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    } else {
        None
    };

    let mut outcome = scanner
        .scan_with_progress(Path::new(&args.directory), progress.as_ref())
        .with_context(|| format!("scan of {} failed", args.directory))?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    // The CSV matrix wants the raw scan order, so export before ranking
    // reorders the records.
    if let Some(csv_path) = &args.csv {
        output::write_csv(Path::new(csv_path), &outcome.results, args.block_size.is_some())
            .with_context(|| format!("could not write CSV to {csv_path}"))?;
        eprintln!("CSV written to: {csv_path}");
    }

    let block_mode = args.block_size.is_some();
    let mut report_body = String::new();

    if let Some(threshold) = args.alarm {
        // Alarm mode: flag outliers per metric, no leaderboard.
        let mut flagged_sets = Vec::with_capacity(outcome.results.len());
        for set in &mut outcome.results {
            let flagged = set.flag_alarms(threshold);
            if !args.json {
                report_body.push_str(&output::format_alarms(set.name(), &flagged));
            }
            flagged_sets.push((set.name().to_string(), flagged));
        }

        if args.json {
            let report = output::ScanReport {
                files_scanned: outcome.files_scanned,
                files_ignored: outcome.files_ignored,
                duration_ms: outcome.duration.as_millis() as u64,
                metrics: flagged_sets
                    .iter()
                    .map(|(name, records)| output::MetricReport {
                        name: name.as_str(),
                        records: records.as_slice(),
                    })
                    .collect(),
                leaderboard: None,
            };
            println!("{}", output::format_json(&report)?);
        } else {
            print!("{report_body}");
        }
    } else {
        // Ranking mode: rank each metric, then aggregate into the leaderboard.
        for set in &mut outcome.results {
            set.rank();
            if !args.json {
                report_body.push_str(&output::format_ranked(set, args.top, block_mode));
            }
        }
        let board = Leaderboard::from_ranked(&outcome.results);

        if args.json {
            let report = output::ScanReport {
                files_scanned: outcome.files_scanned,
                files_ignored: outcome.files_ignored,
                duration_ms: outcome.duration.as_millis() as u64,
                metrics: outcome
                    .results
                    .iter()
                    .map(|set| output::MetricReport { name: set.name(), records: set.records() })
                    .collect(),
                leaderboard: Some(board.entries()),
            };
            println!("{}", output::format_json(&report)?);
        } else {
            report_body.push_str(&output::format_leaderboard(&board, args.top));
            print!("{report_body}");
        }
    }

    if !args.json {
        eprint!("{}", output::format_summary(&outcome));
    }

    Ok(())
}
