//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::EntityType;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// asmchart - chart series for attack-surface data
///
/// Turns exported asset, risk, seed and account records into
/// count or cumulative series ready for charting.
///
/// Examples:
///   asmchart --entity risks --aggregate count_by_severity --input risks.json
///   asmchart -e assets -a total_over_time -i assets.json --format markdown
///   asmchart --list
///   asmchart --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Entity type of the input records (assets, risks, seeds, accounts)
    #[arg(
        short,
        long,
        value_name = "TYPE",
        required_unless_present_any = ["list", "init_config"]
    )]
    pub entity: Option<EntityType>,

    /// Name of the aggregate to compute
    ///
    /// Use --list to see the aggregates available for each entity type.
    #[arg(
        short,
        long,
        value_name = "NAME",
        required_unless_present_any = ["list", "init_config"]
    )]
    pub aggregate: Option<String>,

    /// JSON file holding an array of records
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["list", "init_config"]
    )]
    pub input: Option<PathBuf>,

    /// Output format (json, markdown)
    #[arg(short, long, value_name = "FORMAT", env = "ASMCHART_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .asmchart.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit compact (single-line) JSON
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the available aggregates and exit
    #[arg(long)]
    pub list: bool,

    /// Generate a default .asmchart.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON series (default)
    #[default]
    Json,
    /// Markdown table
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.list || self.init_config {
            return Ok(());
        }

        if let Some(ref name) = self.aggregate {
            if name.trim().is_empty() {
                return Err("Aggregate name must not be empty".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            entity: Some(EntityType::Risks),
            aggregate: Some("count_by_severity".to_string()),
            input: Some(PathBuf::from("fixtures/risks.json")),
            format: None,
            output: None,
            config: None,
            compact: false,
            verbose: false,
            quiet: false,
            list: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_full_command() {
        let args = Args::parse_from([
            "asmchart",
            "--entity",
            "accounts",
            "--aggregate",
            "count_by_domain",
            "--input",
            "accounts.json",
            "--format",
            "markdown",
        ]);

        assert_eq!(args.entity, Some(EntityType::Accounts));
        assert_eq!(args.aggregate.as_deref(), Some("count_by_domain"));
        assert_eq!(args.format, Some(OutputFormat::Markdown));
    }

    #[test]
    fn test_unknown_entity_rejected() {
        let result = Args::try_parse_from([
            "asmchart", "-e", "files", "-a", "count_by_date", "-i", "x.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_needs_no_selection() {
        let args = Args::try_parse_from(["asmchart", "--list"]).unwrap();
        assert!(args.list);
        assert!(args.validate().is_ok());

        assert!(Args::try_parse_from(["asmchart"]).is_err());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("does/not/exist.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_aggregate() {
        let mut args = make_args();
        args.aggregate = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
