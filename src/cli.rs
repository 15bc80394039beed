use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::constants::DEFAULT_FRACTION;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Path to the postcli executable
    pub postcli_path: PathBuf,

    /// POST data directory (holds postdata_metadata.json)
    pub data_dir: PathBuf,

    /// Fraction of each file postcli should verify
    #[arg(long, default_value_t = DEFAULT_FRACTION)]
    pub fraction: f64,

    /// Log postcli command lines and their full output
    #[arg(long)]
    pub debug: bool,

    /// Start without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, LogFormat};
    use clap::Parser;

    #[test]
    fn parses_positionals_with_defaults() {
        let opts = CliOptions::try_parse_from(["spudcheck", "/opt/postcli", "/data/post"])
            .expect("parse");
        assert_eq!(opts.postcli_path.to_str(), Some("/opt/postcli"));
        assert_eq!(opts.data_dir.to_str(), Some("/data/post"));
        assert_eq!(opts.fraction, 0.001);
        assert!(!opts.debug);
        assert!(!opts.yes);
        assert_eq!(opts.log_format, LogFormat::Text);
    }

    #[test]
    fn parses_fraction_and_debug() {
        let opts = CliOptions::try_parse_from([
            "spudcheck",
            "postcli",
            "data",
            "--fraction",
            "0.25",
            "--debug",
        ])
        .expect("parse");
        assert_eq!(opts.fraction, 0.25);
        assert!(opts.debug);
    }

    #[test]
    fn requires_both_positionals() {
        assert!(CliOptions::try_parse_from(["spudcheck", "postcli"]).is_err());
    }

    #[test]
    fn rejects_non_numeric_fraction() {
        assert!(
            CliOptions::try_parse_from(["spudcheck", "postcli", "data", "--fraction", "lots"])
                .is_err()
        );
    }
}
