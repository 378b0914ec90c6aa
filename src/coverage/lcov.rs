//! LCOV coverage report parsing.
//!
//! Parses the line-oriented LCOV text grammar into per-file coverage
//! records. The grammar is deliberately forgiving: unrecognized or
//! out-of-context lines are skipped, malformed counters degrade to zero,
//! and an unterminated trailing record is discarded, so any input string
//! yields a (possibly empty) mapping without ever failing.

use crate::core::{FileCoverage, MetricKind};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed report: absolute source path to its coverage record.
///
/// Ordered map so the suffix-match fallback in [`super::resolve`] scans keys
/// in a deterministic order.
pub type CoverageMap = BTreeMap<PathBuf, FileCoverage>;

/// Two-decimal percentage of `covered` over `total`.
///
/// A metric with zero measurable units (e.g. a file with no branches) is
/// vacuously fully covered rather than undefined or zero.
pub fn percentage(covered: u64, total: u64) -> f64 {
    if total > 0 {
        (covered as f64 / total as f64 * 10000.0).round() / 100.0
    } else {
        100.0
    }
}

pub(crate) fn compute_percentages(data: &mut FileCoverage) {
    for kind in MetricKind::ALL {
        let metric = data.metric_mut(kind);
        metric.pct = percentage(metric.covered, metric.total);
    }
}

/// Counter values are non-negative base-10 integers; anything else degrades
/// to zero rather than aborting the parse.
fn parse_count(value: &str) -> u64 {
    value.trim().parse().unwrap_or(0)
}

/// Parse LCOV report text into a per-file coverage map.
///
/// Tracks a current-file accumulator opened by `SF:` and committed by
/// `end_of_record`. `LF:`/`LH:` mirror into the statement metric since LCOV
/// carries no independent statement counter.
pub fn parse_lcov(text: &str) -> CoverageMap {
    let mut coverage = CoverageMap::new();
    let mut current: Option<(PathBuf, FileCoverage)> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if let Some(path) = line.strip_prefix("SF:") {
            // A new record discards any unterminated previous one.
            current = Some((PathBuf::from(path), FileCoverage::default()));
        } else if let Some(value) = line.strip_prefix("LF:") {
            if let Some((_, data)) = current.as_mut() {
                data.lines.total = parse_count(value);
                data.statements.total = data.lines.total;
            }
        } else if let Some(value) = line.strip_prefix("LH:") {
            if let Some((_, data)) = current.as_mut() {
                data.lines.covered = parse_count(value);
                data.statements.covered = data.lines.covered;
            }
        } else if let Some(value) = line.strip_prefix("BRF:") {
            if let Some((_, data)) = current.as_mut() {
                data.branches.total = parse_count(value);
            }
        } else if let Some(value) = line.strip_prefix("BRH:") {
            if let Some((_, data)) = current.as_mut() {
                data.branches.covered = parse_count(value);
            }
        } else if let Some(value) = line.strip_prefix("FNF:") {
            if let Some((_, data)) = current.as_mut() {
                data.functions.total = parse_count(value);
            }
        } else if let Some(value) = line.strip_prefix("FNH:") {
            if let Some((_, data)) = current.as_mut() {
                data.functions.covered = parse_count(value);
            }
        } else if line == "end_of_record" {
            if let Some((path, mut data)) = current.take() {
                compute_percentages(&mut data);
                coverage.insert(path, data);
            }
        }
    }

    coverage
}

/// Sum every record in the map into one whole-project coverage figure.
///
/// Reference information only; the incremental gate never bases its verdict
/// on this.
pub fn total_coverage(coverage: &CoverageMap) -> FileCoverage {
    let mut total = FileCoverage::default();

    for data in coverage.values() {
        for kind in MetricKind::ALL {
            let metric = data.metric(kind);
            let running = total.metric_mut(kind);
            running.covered += metric.covered;
            running.total += metric.total;
        }
    }

    compute_percentages(&mut total);
    total
}

/// Read and parse an LCOV file. The only failure mode is I/O; the parse
/// itself is total.
pub fn read_lcov_file(path: &Path) -> Result<CoverageMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read coverage file {}", path.display()))?;
    Ok(parse_lcov(&text))
}
