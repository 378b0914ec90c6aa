//! Core value objects for coverage measurement.
//!
//! Everything here is a plain immutable record: constructed once per run,
//! serialized for reporting, and discarded. No entity carries state across
//! invocations.

use serde::{Deserialize, Serialize};

/// One coverage dimension: how many units exist and how many were hit.
///
/// `pct` is derived from `covered` and `total` via [`crate::coverage::percentage`],
/// never set independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetric {
    pub covered: u64,
    pub total: u64,
    pub pct: f64,
}

/// The four dimensions tracked for every file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Lines,
    Statements,
    Branches,
    Functions,
}

impl MetricKind {
    /// All dimensions, in accumulation order.
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Lines,
        MetricKind::Statements,
        MetricKind::Branches,
        MetricKind::Functions,
    ];

    /// Evaluation order used by the threshold gate.
    pub const CHECK_ORDER: [MetricKind; 4] = [
        MetricKind::Lines,
        MetricKind::Branches,
        MetricKind::Functions,
        MetricKind::Statements,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Lines => "lines",
            MetricKind::Statements => "statements",
            MetricKind::Branches => "branches",
            MetricKind::Functions => "functions",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Lines => "line coverage",
            MetricKind::Statements => "statement coverage",
            MetricKind::Branches => "branch coverage",
            MetricKind::Functions => "function coverage",
        }
    }
}

/// Raw coverage counts for one file, or for a reduced summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    pub lines: CoverageMetric,
    pub statements: CoverageMetric,
    pub branches: CoverageMetric,
    pub functions: CoverageMetric,
}

impl FileCoverage {
    pub fn metric(&self, kind: MetricKind) -> &CoverageMetric {
        match kind {
            MetricKind::Lines => &self.lines,
            MetricKind::Statements => &self.statements,
            MetricKind::Branches => &self.branches,
            MetricKind::Functions => &self.functions,
        }
    }

    pub fn metric_mut(&mut self, kind: MetricKind) -> &mut CoverageMetric {
        match kind {
            MetricKind::Lines => &mut self.lines,
            MetricKind::Statements => &mut self.statements,
            MetricKind::Branches => &mut self.branches,
            MetricKind::Functions => &mut self.functions,
        }
    }

    /// A record with no lines, branches, or functions retained no executable
    /// code after compilation (e.g. a file of pure type declarations).
    pub fn is_type_only(&self) -> bool {
        self.lines.total == 0 && self.functions.total == 0 && self.branches.total == 0
    }
}

/// Per-file outcome of an incremental run, keyed by the path the caller
/// asked about rather than the absolute path recorded in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub file: String,
    pub has_coverage: bool,
    pub is_type_only: bool,
    #[serde(flatten)]
    pub coverage: FileCoverage,
}

impl FileResult {
    /// Result for a file the report knows nothing about.
    pub fn not_covered(file: String) -> Self {
        Self {
            file,
            has_coverage: false,
            is_type_only: false,
            coverage: FileCoverage::default(),
        }
    }
}

/// Complete outcome of reducing a changed-file set against a coverage map.
///
/// `files` is sorted ascending by line percentage so the least-covered
/// changed files surface first; `type_only_files` keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncrementalResult {
    pub files: Vec<FileResult>,
    pub type_only_files: Vec<FileResult>,
    pub summary: FileCoverage,
}

/// Minimum acceptable percentage per dimension, all in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdValues {
    pub lines: f64,
    pub branches: f64,
    pub functions: f64,
    pub statements: f64,
}

impl Default for ThresholdValues {
    fn default() -> Self {
        Self {
            lines: 60.0,
            branches: 50.0,
            functions: 50.0,
            statements: 60.0,
        }
    }
}

impl ThresholdValues {
    pub fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Lines => self.lines,
            MetricKind::Statements => self.statements,
            MetricKind::Branches => self.branches,
            MetricKind::Functions => self.functions,
        }
    }

    pub fn value_mut(&mut self, kind: MetricKind) -> &mut f64 {
        match kind {
            MetricKind::Lines => &mut self.lines,
            MetricKind::Statements => &mut self.statements,
            MetricKind::Branches => &mut self.branches,
            MetricKind::Functions => &mut self.functions,
        }
    }
}

/// One row of the threshold verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCheckDetail {
    pub name: String,
    pub key: MetricKind,
    pub actual: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// Pass/fail verdict with one detail entry per dimension, in
/// [`MetricKind::CHECK_ORDER`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCheckResult {
    pub passed: bool,
    pub details: Vec<ThresholdCheckDetail>,
}

impl ThresholdCheckResult {
    pub fn failed(&self) -> impl Iterator<Item = &ThresholdCheckDetail> {
        self.details.iter().filter(|detail| !detail.passed)
    }
}
