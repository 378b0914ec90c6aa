use crate::ci::RunMode;
use crate::config::ThresholdPreset;
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "covgate")]
#[command(about = "Incremental code coverage analyzer and CI threshold gate", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check coverage of changed files against thresholds
    Check {
        /// Repository path to operate in
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Which changed-file set to measure (auto-detected from the CI
        /// environment when omitted)
        #[arg(long, value_enum)]
        mode: Option<RunMode>,

        /// LCOV coverage report to read
        #[arg(long = "coverage-file", visible_alias = "lcov")]
        coverage_file: Option<PathBuf>,

        /// Configuration file (defaults to .covgate.toml in PATH)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Threshold preset (strict, balanced, lenient)
        #[arg(long, value_enum)]
        preset: Option<ThresholdPreset>,

        /// Exit non-zero when the gate fails
        #[arg(long)]
        strict: bool,

        /// Base branch for PR mode (defaults to the configured baseline)
        #[arg(long)]
        base: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the whole-project reference coverage section
        #[arg(long = "no-total")]
        no_total: bool,
    },

    /// Initialize a .covgate.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print whole-project coverage from an LCOV report
    Total {
        /// LCOV coverage report to read
        #[arg(
            long = "coverage-file",
            visible_alias = "lcov",
            default_value = "coverage/lcov.info"
        )]
        coverage_file: PathBuf,
    },
}
