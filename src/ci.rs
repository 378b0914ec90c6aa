//! CI environment detection and output channels.
//!
//! Maps CI-provided environment variables into a platform-neutral
//! [`CiEnvironment`], resolves the effective [`RunMode`] and [`RunContext`]
//! for a run, and routes warnings, errors, and output variables to the
//! platform's native channel (workflow commands on GitHub Actions, stderr
//! elsewhere).

use crate::config::ResolvedConfig;
use crate::git::GitRepo;
use clap::ValueEnum;
use serde::Serialize;
use std::env;
use std::fs::OpenOptions;
use std::io::Write as _;

/// Which set of changed files a run measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Files staged in the index (pre-commit hook)
    Staged,
    /// Files of the current commit
    Commit,
    /// CI pipeline run over the current commit
    Ci,
    /// Accumulated pull-request diff against the base branch
    Pr,
}

impl RunMode {
    pub fn description(&self) -> &'static str {
        match self {
            RunMode::Staged => "staged files (pre-commit)",
            RunMode::Commit => "current commit",
            RunMode::Ci => "CI pipeline (current commit)",
            RunMode::Pr => "pull-request diff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CiPlatform {
    GithubActions,
    Generic,
    Local,
}

/// What the CI environment variables say about this run.
#[derive(Debug, Clone, Serialize)]
pub struct CiEnvironment {
    pub platform: CiPlatform,
    pub is_ci: bool,
    pub is_pr: bool,
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub pr_number: Option<String>,
    pub target_branch: Option<String>,
}

pub fn detect() -> CiEnvironment {
    detect_from(|key| env::var(key).ok())
}

pub(crate) fn detect_from(lookup: impl Fn(&str) -> Option<String>) -> CiEnvironment {
    if lookup("GITHUB_ACTIONS").as_deref() == Some("true") {
        let is_pr = matches!(
            lookup("GITHUB_EVENT_NAME").as_deref(),
            Some("pull_request") | Some("pull_request_target")
        );
        return CiEnvironment {
            platform: CiPlatform::GithubActions,
            is_ci: true,
            is_pr,
            // Pull requests run on a synthetic merge ref; the head ref is
            // the branch the author actually pushed.
            branch: lookup("GITHUB_HEAD_REF")
                .filter(|value| !value.is_empty())
                .or_else(|| lookup("GITHUB_REF_NAME")),
            commit: lookup("GITHUB_SHA"),
            pr_number: lookup("GITHUB_REF").as_deref().and_then(parse_pr_number),
            target_branch: lookup("GITHUB_BASE_REF").filter(|value| !value.is_empty()),
        };
    }

    if is_truthy(lookup("CI").as_deref()) {
        return CiEnvironment {
            platform: CiPlatform::Generic,
            is_ci: true,
            is_pr: false,
            branch: None,
            commit: None,
            pr_number: None,
            target_branch: None,
        };
    }

    CiEnvironment {
        platform: CiPlatform::Local,
        is_ci: false,
        is_pr: false,
        branch: None,
        commit: None,
        pr_number: None,
        target_branch: None,
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(raw) if !raw.is_empty() && raw != "false" && raw != "0")
}

/// Extract the PR number from a `refs/pull/<n>/merge` ref.
fn parse_pr_number(github_ref: &str) -> Option<String> {
    let rest = github_ref.strip_prefix("refs/pull/")?;
    let (number, tail) = rest.split_once('/')?;
    let is_number = !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit());
    (tail == "merge" && is_number).then(|| number.to_string())
}

/// Effective mode for this run.
///
/// An explicit `--mode ci` still auto-upgrades to PR when the environment
/// says the pipeline runs for a pull request; other explicit modes are
/// taken as-is. Without an explicit mode, CI environments pick `ci`/`pr`
/// and local runs measure the current commit.
pub fn resolve_mode(requested: Option<RunMode>, ci: &CiEnvironment) -> RunMode {
    match requested {
        Some(RunMode::Ci) if ci.is_pr => RunMode::Pr,
        Some(mode) => mode,
        None if ci.is_ci && ci.is_pr => RunMode::Pr,
        None if ci.is_ci => RunMode::Ci,
        None => RunMode::Commit,
    }
}

/// Everything the reporters need to know about where and how a run happened.
#[derive(Debug, Clone, Serialize)]
pub struct RunContext {
    pub mode: RunMode,
    pub branch: String,
    pub commit: String,
    pub is_ci: bool,
    pub is_pr: bool,
    pub pr_number: Option<String>,
    pub target_branch: Option<String>,
}

/// CI environment variables win over git queries; the configured baseline
/// branch is the PR-target fallback.
pub fn resolve_context(
    mode: RunMode,
    ci: &CiEnvironment,
    repo: &GitRepo,
    config: &ResolvedConfig,
) -> RunContext {
    let branch = ci
        .branch
        .clone()
        .or_else(|| repo.current_branch().ok())
        .unwrap_or_else(|| "unknown".to_string());
    let commit = ci
        .commit
        .clone()
        .or_else(|| repo.head_commit().ok())
        .unwrap_or_else(|| "HEAD".to_string());

    let is_pr = mode == RunMode::Pr;
    let is_ci = mode == RunMode::Ci || is_pr || ci.is_ci;
    let target_branch = is_pr.then(|| {
        ci.target_branch
            .clone()
            .unwrap_or_else(|| config.baseline_branch.clone())
    });

    RunContext {
        mode,
        branch,
        commit,
        is_ci,
        is_pr,
        pr_number: ci.pr_number.clone(),
        target_branch,
    }
}

/// Platform-native channel for annotations and output variables.
pub struct CiOutput {
    platform: CiPlatform,
}

impl CiOutput {
    pub fn new(platform: CiPlatform) -> Self {
        Self { platform }
    }

    /// Publish a key=value output variable.
    pub fn set_output(&self, key: &str, value: &str) {
        match self.platform {
            CiPlatform::GithubActions => {
                if let Ok(path) = env::var("GITHUB_OUTPUT") {
                    let appended = OpenOptions::new()
                        .append(true)
                        .create(true)
                        .open(&path)
                        .and_then(|mut file| writeln!(file, "{key}={value}"));
                    if let Err(e) = appended {
                        log::warn!("failed to append to GITHUB_OUTPUT: {e}");
                    }
                } else {
                    // Pre-GITHUB_OUTPUT runners.
                    println!("::set-output name={key}::{value}");
                }
            }
            _ => log::debug!("output {key}={value}"),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.platform {
            CiPlatform::GithubActions => println!("::warning::{message}"),
            _ => eprintln!("warning: {message}"),
        }
    }

    pub fn error(&self, message: &str) {
        match self.platform {
            CiPlatform::GithubActions => println!("::error::{message}"),
            _ => eprintln!("error: {message}"),
        }
    }
}
