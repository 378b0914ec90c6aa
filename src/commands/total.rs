//! Whole-project coverage, printed standalone.

use crate::coverage::{read_lcov_file, total_coverage};
use crate::errors::CovgateError;
use anyhow::Result;
use colored::*;
use std::path::Path;

pub fn run_total(coverage_file: &Path) -> Result<()> {
    if !coverage_file.exists() {
        return Err(CovgateError::CoverageFileNotFound {
            path: coverage_file.to_path_buf(),
        }
        .into());
    }

    let coverage = read_lcov_file(coverage_file)?;
    let total = total_coverage(&coverage);

    println!();
    println!("{}", "Whole-project coverage".bold());
    println!("  files:      {}", coverage.len());
    println!(
        "  lines:      {}% ({}/{})",
        total.lines.pct, total.lines.covered, total.lines.total
    );
    println!(
        "  statements: {}% ({}/{})",
        total.statements.pct, total.statements.covered, total.statements.total
    );
    println!(
        "  branches:   {}% ({}/{})",
        total.branches.pct, total.branches.covered, total.branches.total
    );
    println!(
        "  functions:  {}% ({}/{})",
        total.functions.pct, total.functions.covered, total.functions.total
    );
    println!();

    Ok(())
}
