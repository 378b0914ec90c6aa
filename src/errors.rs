//! Domain errors raised by the outer layers.
//!
//! The coverage core itself never fails; these are the conditions the I/O
//! and configuration collaborators can hit.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CovgateError {
    #[error("coverage file not found: {path} (run your tests with LCOV output first)")]
    CoverageFileNotFound { path: PathBuf },

    #[error("{path} is not inside a git repository")]
    NotARepository { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
