//! Incremental coverage computation over parsed LCOV data.
//!
//! Four pure stages: parse the report ([`lcov`]), match caller paths to
//! records ([`resolve`]), reduce a changed-file set into one summary
//! ([`incremental`]), and gate the summary against thresholds
//! ([`thresholds`]). None of them perform I/O or fail.

pub mod incremental;
pub mod lcov;
pub mod resolve;
pub mod thresholds;

pub use incremental::incremental_coverage;
pub use lcov::{parse_lcov, percentage, read_lcov_file, total_coverage, CoverageMap};
pub use resolve::resolve_file_coverage;
pub use thresholds::check_thresholds;
