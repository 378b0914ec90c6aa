//! Threshold gate over a coverage summary.

use crate::core::{
    FileCoverage, MetricKind, ThresholdCheckDetail, ThresholdCheckResult, ThresholdValues,
};

/// Compare each dimension of `summary` against its threshold.
///
/// Thresholds are inclusive: an actual percentage equal to its threshold
/// passes. The overall verdict is the conjunction of all four dimensions,
/// evaluated in [`MetricKind::CHECK_ORDER`].
pub fn check_thresholds(
    summary: &FileCoverage,
    thresholds: &ThresholdValues,
) -> ThresholdCheckResult {
    let mut result = ThresholdCheckResult {
        passed: true,
        details: Vec::with_capacity(MetricKind::CHECK_ORDER.len()),
    };

    for kind in MetricKind::CHECK_ORDER {
        let actual = summary.metric(kind).pct;
        let threshold = thresholds.value(kind);
        let passed = actual >= threshold;

        result.details.push(ThresholdCheckDetail {
            name: kind.display_name().to_string(),
            key: kind,
            actual,
            threshold,
            passed,
        });

        if !passed {
            result.passed = false;
        }
    }

    result
}
