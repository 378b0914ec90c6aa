//! Reducing a changed-file set against a coverage map.

use super::lcov::{percentage, CoverageMap};
use super::resolve::resolve_file_coverage;
use crate::core::{FileCoverage, FileResult, IncrementalResult, MetricKind};
use std::cmp::Ordering;
use std::path::Path;

/// Build one result per changed file and reduce them into a summary.
///
/// Files the report knows nothing about are kept with `has_coverage = false`
/// and all-zero metrics. Files whose record retained no executable code go
/// to `type_only_files` with their line percentage forced to 100 and are
/// excluded from the summary reduction.
///
/// The summary percentage per dimension is three-way: the plain ratio when
/// that dimension accumulated any units; 100 when nothing was measurable but
/// something was actually tracked (only type-only files, or a dimension such
/// as branches that no resolved file had); 0 when changed files exist but
/// none resolved to coverage data at all. An empty `changed_files` input
/// lands in the 0% branch — callers wanting "no changes means success" must
/// special-case that before calling here.
pub fn incremental_coverage(
    coverage: &CoverageMap,
    changed_files: &[String],
    cwd: &Path,
) -> IncrementalResult {
    let mut files: Vec<FileResult> = Vec::new();
    let mut type_only_files: Vec<FileResult> = Vec::new();
    let mut summary = FileCoverage::default();

    for file in changed_files {
        match resolve_file_coverage(coverage, file, cwd) {
            None => files.push(FileResult::not_covered(file.clone())),
            Some(data) if data.is_type_only() => {
                let mut result = FileResult::not_covered(file.clone());
                result.has_coverage = true;
                result.is_type_only = true;
                result.coverage.lines.pct = 100.0;
                type_only_files.push(result);
            }
            Some(data) => {
                for kind in MetricKind::ALL {
                    let metric = data.metric(kind);
                    let running = summary.metric_mut(kind);
                    running.covered += metric.covered;
                    running.total += metric.total;
                }
                files.push(FileResult {
                    file: file.clone(),
                    has_coverage: true,
                    is_type_only: false,
                    coverage: data.clone(),
                });
            }
        }
    }

    let has_only_type_files = files.is_empty() && !type_only_files.is_empty();
    let has_any_with_coverage = files.iter().any(|f| f.has_coverage);

    for kind in MetricKind::ALL {
        let metric = summary.metric_mut(kind);
        metric.pct = if metric.total > 0 {
            percentage(metric.covered, metric.total)
        } else if has_only_type_files || has_any_with_coverage {
            100.0
        } else {
            0.0
        };
    }

    // Least-covered files first. sort_by is stable, so equal percentages
    // keep their input order.
    files.sort_by(|a, b| {
        a.coverage
            .lines
            .pct
            .partial_cmp(&b.coverage.lines.pct)
            .unwrap_or(Ordering::Equal)
    });

    IncrementalResult {
        files,
        type_only_files,
        summary,
    }
}
