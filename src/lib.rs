// Export modules for library usage
pub mod ci;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod coverage;
pub mod errors;
pub mod git;
pub mod output;

// Re-export commonly used types
pub use crate::core::{
    CoverageMetric, FileCoverage, FileResult, IncrementalResult, MetricKind,
    ThresholdCheckDetail, ThresholdCheckResult, ThresholdValues,
};

pub use crate::coverage::{
    check_thresholds, incremental_coverage, parse_lcov, percentage, read_lcov_file,
    resolve_file_coverage, total_coverage, CoverageMap,
};

pub use crate::ci::{CiEnvironment, CiPlatform, RunContext, RunMode};
pub use crate::config::{CovgateConfig, ResolvedConfig, ThresholdPreset};
pub use crate::errors::CovgateError;
pub use crate::git::GitRepo;
pub use crate::output::{create_writer, CheckReport, OutputFormat, OutputWriter};
