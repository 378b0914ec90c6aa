//! The serializable bundle reporters consume.

use crate::ci::RunContext;
use crate::core::{
    FileCoverage, IncrementalResult, MetricKind, ThresholdCheckResult,
};
use serde::Serialize;

/// Everything one `check` run produced, handed to a reporter as a single
/// immutable snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub context: RunContext,
    pub changed_files: Vec<String>,
    pub incremental: IncrementalResult,
    /// Whole-project coverage, reference information only.
    pub total: Option<FileCoverage>,
    pub thresholds: ThresholdCheckResult,
    pub passed: bool,
    pub strict_mode: bool,
}

impl CheckReport {
    /// Report for a run whose filtered change set was empty: nothing to
    /// measure, so the gate passes vacuously with every summary percentage
    /// at 100 and no threshold details.
    pub fn empty(context: RunContext, strict_mode: bool) -> Self {
        let mut summary = FileCoverage::default();
        for kind in MetricKind::ALL {
            summary.metric_mut(kind).pct = 100.0;
        }

        Self {
            context,
            changed_files: Vec::new(),
            incremental: IncrementalResult {
                files: Vec::new(),
                type_only_files: Vec::new(),
                summary,
            },
            total: None,
            thresholds: ThresholdCheckResult {
                passed: true,
                details: Vec::new(),
            },
            passed: true,
            strict_mode,
        }
    }

    /// Threshold configured for the line dimension, used by reporters to
    /// mark individual files. Zero when no check ran.
    pub fn line_threshold(&self) -> f64 {
        self.thresholds
            .details
            .iter()
            .find(|detail| detail.key == MetricKind::Lines)
            .map(|detail| detail.threshold)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::RunMode;

    fn context() -> RunContext {
        RunContext {
            mode: RunMode::Commit,
            branch: "main".to_string(),
            commit: "abc123".to_string(),
            is_ci: false,
            is_pr: false,
            pr_number: None,
            target_branch: None,
        }
    }

    #[test]
    fn empty_report_passes_vacuously() {
        let report = CheckReport::empty(context(), true);

        assert!(report.passed);
        assert!(report.thresholds.passed);
        assert!(report.thresholds.details.is_empty());
        assert!(report.changed_files.is_empty());
        assert_eq!(report.incremental.summary.lines.pct, 100.0);
        assert_eq!(report.incremental.summary.branches.pct, 100.0);
        assert!(report.strict_mode);
    }
}
