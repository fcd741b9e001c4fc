use crate::config::{ScanConfig, SMALLEST_FILE_SIZE};
use crate::metrics::MetricKind;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "stray")]
#[command(about = "Statistical scanner that hunts obfuscated and encrypted files hiding among plaintext")]
#[command(version)]
pub struct Args {
    /// Directory to scan
    pub directory: String,

    /// Filename filter regex, matched against the basename
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Run the standard battery (ic, entropy, longest-token, signature, strict-signature)
    #[arg(short, long)]
    pub all: bool,

    /// Run the entropy test
    #[arg(short, long)]
    pub entropy: bool,

    /// Run the longest-token test
    #[arg(short, long)]
    pub longest_token: bool,

    /// Run the index-of-coincidence test
    #[arg(short, long)]
    pub ic: bool,

    /// Run the signature test
    #[arg(short, long)]
    pub signature: bool,

    /// Run the strict signature test (matches weighted x2)
    #[arg(short = 'S', long)]
    pub strict_signature: bool,

    /// Run the eval-usage signature test
    #[arg(short = 'E', long)]
    pub eval: bool,

    /// Run the compression-ratio test
    #[arg(short = 'z', long)]
    pub compression: bool,

    /// Score fixed-size blocks and keep the most extreme block per file
    #[arg(short, long, value_name = "BYTES")]
    pub block_size: Option<usize>,

    /// Flag statistical outliers above this deviation threshold instead of ranking
    #[arg(short = 'm', long, value_name = "THRESHOLD")]
    pub alarm: Option<f64>,

    /// Write the raw per-file score matrix to a CSV file
    #[arg(short, long, value_name = "FILE")]
    pub csv: Option<String>,

    /// Skip files that decode to mostly non-ASCII text
    #[arg(short = 'u', long)]
    pub skip_unicode: bool,

    /// Follow symbolic links during traversal
    #[arg(short, long)]
    pub follow_symlinks: bool,

    /// Number of results to display per metric and on the leaderboard
    #[arg(short, long, default_value_t = 10)]
    pub top: usize,

    /// Worker threads (defaults to the number of cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Emit the report as JSON instead of terminal tables
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Metrics selected on the command line, in battery order.
    pub fn metric_kinds(&self) -> Vec<MetricKind> {
        if self.all {
            return vec![
                MetricKind::IndexOfCoincidence,
                MetricKind::Entropy,
                MetricKind::LongestToken,
                MetricKind::Signature,
                MetricKind::StrictSignature,
            ];
        }

        let mut kinds = Vec::new();
        if self.entropy {
            kinds.push(MetricKind::Entropy);
        }
        if self.longest_token {
            kinds.push(MetricKind::LongestToken);
        }
        if self.ic {
            kinds.push(MetricKind::IndexOfCoincidence);
        }
        if self.signature {
            kinds.push(MetricKind::Signature);
        }
        if self.strict_signature {
            kinds.push(MetricKind::StrictSignature);
        }
        if self.eval {
            kinds.push(MetricKind::EvalUsage);
        }
        if self.compression {
            kinds.push(MetricKind::CompressionRatio);
        }
        kinds
    }

    pub fn to_config(&self) -> ScanConfig {
        ScanConfig {
            metrics: self.metric_kinds(),
            block_size: self.block_size,
            alarm_threshold: self.alarm,
            follow_symlinks: self.follow_symlinks,
            filename_filter: self.filter.clone(),
            min_file_size: SMALLEST_FILE_SIZE,
            skip_unicode: self.skip_unicode,
            top_count: self.top,
            jobs: self.jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flag_selects_the_standard_battery() {
        let args = Args::parse_from(["stray", "-a", "/tmp"]);
        let kinds = args.metric_kinds();
        assert_eq!(
            kinds,
            [
                MetricKind::IndexOfCoincidence,
                MetricKind::Entropy,
                MetricKind::LongestToken,
                MetricKind::Signature,
                MetricKind::StrictSignature,
            ]
        );
    }

    #[test]
    fn individual_flags_compose() {
        let args = Args::parse_from(["stray", "-e", "-z", "/tmp"]);
        assert_eq!(args.metric_kinds(), [MetricKind::Entropy, MetricKind::CompressionRatio]);
    }

    #[test]
    fn no_flags_select_no_metrics() {
        let args = Args::parse_from(["stray", "/tmp"]);
        assert!(args.metric_kinds().is_empty());
    }

    #[test]
    fn config_carries_the_surface_values() {
        let args = Args::parse_from([
            "stray", "-e", "-b", "2048", "-m", "2.0", "-f", "-u", "/srv/www", r"\.php$",
        ]);
        let config = args.to_config();
        assert_eq!(config.block_size, Some(2048));
        assert_eq!(config.alarm_threshold, Some(2.0));
        assert!(config.follow_symlinks);
        assert!(config.skip_unicode);
        assert_eq!(config.filename_filter, r"\.php$");
        assert!(config.validate().is_ok());
    }
}
