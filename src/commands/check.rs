//! The incremental coverage gate.

use crate::ci::{self, CiOutput, RunContext, RunMode};
use crate::config::{self, ResolvedConfig, ThresholdPreset};
use crate::coverage::{check_thresholds, incremental_coverage, read_lcov_file, total_coverage};
use crate::errors::CovgateError;
use crate::git::{self, GitRepo};
use crate::output::{self, CheckReport, OutputFormat};
use anyhow::Result;
use std::path::PathBuf;

pub struct CheckOptions {
    pub path: PathBuf,
    pub mode: Option<RunMode>,
    pub coverage_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub preset: Option<ThresholdPreset>,
    pub strict: bool,
    pub base: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub no_total: bool,
}

pub struct CheckOutcome {
    pub passed: bool,
    pub strict_mode: bool,
}

pub fn run_check(options: CheckOptions) -> Result<CheckOutcome> {
    let raw = config::load_config(options.config.as_deref(), &options.path)?;
    let mut config = config::resolve_config(&raw, options.preset)?;
    if options.strict {
        config.strict_mode = true;
    }
    if let Some(file) = options.coverage_file {
        config.coverage_file = file;
    }
    if let Some(base) = options.base {
        config.baseline_branch = base;
    }

    let ci_env = ci::detect();
    let mode = ci::resolve_mode(options.mode, &ci_env);
    let repo = GitRepo::discover(&options.path)?;
    let context = ci::resolve_context(mode, &ci_env, &repo, &config);

    let changed_files = collect_changed_files(&repo, &context, &config)?;
    log::debug!(
        "{} changed files after filtering (mode: {})",
        changed_files.len(),
        context.mode.description()
    );

    let ci_out = CiOutput::new(ci_env.platform);
    let mut writer = output::create_writer(options.format, options.output.as_deref())?;

    // The aggregator reports a raw 0% for an empty change set; "no changes
    // means success" is this layer's policy, decided before aggregation.
    if changed_files.is_empty() {
        let report = CheckReport::empty(context, config.strict_mode);
        writer.write_report(&report)?;
        ci_out.set_output("passed", "true");
        return Ok(CheckOutcome {
            passed: true,
            strict_mode: config.strict_mode,
        });
    }

    let coverage_path = if config.coverage_file.is_absolute() {
        config.coverage_file.clone()
    } else {
        repo.repo_path().join(&config.coverage_file)
    };
    if !coverage_path.exists() {
        return Err(CovgateError::CoverageFileNotFound {
            path: coverage_path,
        }
        .into());
    }
    let coverage = read_lcov_file(&coverage_path)?;

    let incremental = incremental_coverage(&coverage, &changed_files, repo.repo_path());
    let total = (!options.no_total).then(|| total_coverage(&coverage));
    let thresholds = check_thresholds(&incremental.summary, &config.thresholds);
    let passed = thresholds.passed;

    let report = CheckReport {
        context,
        changed_files,
        incremental,
        total,
        thresholds,
        passed,
        strict_mode: config.strict_mode,
    };
    writer.write_report(&report)?;
    annotate(&ci_out, &report);

    Ok(CheckOutcome {
        passed,
        strict_mode: config.strict_mode,
    })
}

fn collect_changed_files(
    repo: &GitRepo,
    context: &RunContext,
    config: &ResolvedConfig,
) -> Result<Vec<String>> {
    let files = match context.mode {
        RunMode::Staged => repo.staged_files()?,
        RunMode::Pr => {
            let base = context
                .target_branch
                .as_deref()
                .unwrap_or(&config.baseline_branch);
            repo.files_against(base)?
        }
        RunMode::Commit | RunMode::Ci => repo.commit_files(&context.commit)?,
    };
    Ok(git::filter_files(files, &config.file_filter))
}

fn annotate(ci_out: &CiOutput, report: &CheckReport) {
    ci_out.set_output("passed", if report.passed { "true" } else { "false" });
    ci_out.set_output(
        "line_coverage",
        &format!("{}", report.incremental.summary.lines.pct),
    );

    let uncovered: Vec<&str> = report
        .incremental
        .files
        .iter()
        .filter(|file| !file.has_coverage)
        .map(|file| file.file.as_str())
        .collect();
    if !uncovered.is_empty() {
        ci_out.warning(&format!(
            "{} changed file(s) have no coverage data: {}",
            uncovered.len(),
            uncovered.join(", ")
        ));
    }

    for detail in report.thresholds.failed() {
        ci_out.error(&format!(
            "{} {}% is below the {}% threshold",
            detail.name, detail.actual, detail.threshold
        ));
    }
}
