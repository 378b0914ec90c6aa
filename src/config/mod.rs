//! Configuration loading and resolution.
//!
//! Raw configuration comes from `.covgate.toml` with every field optional;
//! [`resolve_config`] layers preset, file, and environment values into a
//! fully-populated [`ResolvedConfig`].

pub mod loader;
pub mod presets;

pub use loader::load_config;
pub use presets::ThresholdPreset;

use crate::core::{MetricKind, ThresholdValues};
use crate::errors::CovgateError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// User-facing configuration as written in `.covgate.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CovgateConfig {
    #[serde(default)]
    pub preset: Option<ThresholdPreset>,

    /// LCOV report location, relative to the repository root.
    #[serde(default)]
    pub coverage_file: Option<PathBuf>,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub file_filter: FileFilterConfig,

    /// Exit non-zero when the gate fails.
    #[serde(default)]
    pub strict_mode: Option<bool>,

    /// Base branch a pull request is compared against.
    #[serde(default)]
    pub baseline_branch: Option<String>,
}

/// Per-dimension threshold overrides. Unset fields fall back to the preset.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub lines: Option<f64>,
    pub branches: Option<f64>,
    pub functions: Option<f64>,
    pub statements: Option<f64>,
}

impl ThresholdsConfig {
    fn value(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Lines => self.lines,
            MetricKind::Statements => self.statements,
            MetricKind::Branches => self.branches,
            MetricKind::Functions => self.functions,
        }
    }
}

/// Which changed files participate in the gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileFilterConfig {
    /// Extension allow-list, without the leading dot.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Regex patterns a path must match when non-empty.
    #[serde(default)]
    pub include: Option<Vec<String>>,

    /// Regex patterns that drop a path.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

fn default_extensions() -> Vec<String> {
    ["rs", "ts", "tsx", "js", "jsx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_include() -> Vec<String> {
    vec!["src/".to_string()]
}

fn default_exclude() -> Vec<String> {
    [
        r"\.d\.ts$",
        r"(^|/)tests?/",
        r"_tests?\.rs$",
        r"\.(test|spec)\.[jt]sx?$",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Fully-populated configuration every run operates on.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub preset: ThresholdPreset,
    pub coverage_file: PathBuf,
    pub thresholds: ThresholdValues,
    pub file_filter: ResolvedFileFilter,
    pub strict_mode: bool,
    pub baseline_branch: String,
}

/// File filter with its patterns compiled once.
#[derive(Debug, Clone)]
pub struct ResolvedFileFilter {
    pub extensions: Vec<String>,
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
}

impl ResolvedFileFilter {
    /// Whether a repo-relative path participates in the gate.
    pub fn matches(&self, file: &str) -> bool {
        let extension = Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        if !self.extensions.iter().any(|allowed| allowed == extension) {
            return false;
        }

        if self.exclude.iter().any(|pattern| pattern.is_match(file)) {
            return false;
        }

        if !self.include.is_empty() {
            return self.include.iter().any(|pattern| pattern.is_match(file));
        }

        true
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, CovgateError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                CovgateError::InvalidConfig(format!("bad file filter pattern {pattern:?}: {e}"))
            })
        })
        .collect()
}

/// Layer preset, file, and environment configuration into a resolved config.
///
/// Precedence per field: environment > config file > preset/default. A
/// preset passed on the command line wins over one in the file. Threshold
/// values are clamped to `[0, 100]`.
pub fn resolve_config(
    raw: &CovgateConfig,
    cli_preset: Option<ThresholdPreset>,
) -> Result<ResolvedConfig, CovgateError> {
    let preset = cli_preset.or(raw.preset).unwrap_or_default();

    let mut thresholds = preset.thresholds();
    for kind in MetricKind::ALL {
        if let Some(value) = raw.thresholds.value(kind) {
            *thresholds.value_mut(kind) = value;
        }
    }
    apply_threshold_env(&mut thresholds, |key| env::var(key).ok());
    for kind in MetricKind::ALL {
        let value = thresholds.value_mut(kind);
        *value = value.clamp(0.0, 100.0);
    }

    let filter = &raw.file_filter;
    let file_filter = ResolvedFileFilter {
        extensions: filter.extensions.clone().unwrap_or_else(default_extensions),
        include: compile_patterns(&filter.include.clone().unwrap_or_else(default_include))?,
        exclude: compile_patterns(&filter.exclude.clone().unwrap_or_else(default_exclude))?,
    };

    let strict_mode = parse_boolean(
        env::var("COVGATE_STRICT").ok(),
        raw.strict_mode.unwrap_or(false),
    );
    let baseline_branch = env::var("COVGATE_BASELINE_BRANCH")
        .ok()
        .filter(|value| !value.is_empty())
        .or_else(|| raw.baseline_branch.clone())
        .unwrap_or_else(|| "master".to_string());

    Ok(ResolvedConfig {
        preset,
        coverage_file: raw
            .coverage_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("coverage/lcov.info")),
        thresholds,
        file_filter,
        strict_mode,
        baseline_branch,
    })
}

/// Apply `COVGATE_THRESHOLD_<DIMENSION>` overrides.
fn apply_threshold_env(
    thresholds: &mut ThresholdValues,
    lookup: impl Fn(&str) -> Option<String>,
) {
    for kind in MetricKind::ALL {
        let key = format!("COVGATE_THRESHOLD_{}", kind.key().to_uppercase());
        if let Some(value) = lookup(&key).and_then(|raw| parse_number(&raw)) {
            *thresholds.value_mut(kind) = value;
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn parse_boolean(value: Option<String>, default: bool) -> bool {
    match value.as_deref() {
        None | Some("") => default,
        Some(raw) => raw == "true" || raw == "1",
    }
}
