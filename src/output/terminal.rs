//! Colored stdout reporter.

use super::report::CheckReport;
use super::{format_pct, OutputWriter};
use crate::core::FileResult;
use colored::*;

pub struct TerminalWriter;

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for TerminalWriter {
    fn write_report(&mut self, report: &CheckReport) -> anyhow::Result<()> {
        print_header(report);
        print_file_stats(report);
        print_type_only_files(&report.incremental.type_only_files);
        print_file_details(&report.incremental.files, report.line_threshold());
        print_summary(report);
        print_threshold_checks(report);
        print_total(report);
        print_verdict(report);
        Ok(())
    }
}

fn divider() -> String {
    "=".repeat(70)
}

fn print_header(report: &CheckReport) {
    println!();
    println!("{}", "Incremental Coverage Report".bold());
    println!("{}", divider());
    println!("  mode:   {}", report.context.mode.description());
    println!("  branch: {}", report.context.branch);
    println!("  commit: {}", report.context.commit);
    if let Some(target) = &report.context.target_branch {
        println!("  target: {target}");
    }
}

fn print_file_stats(report: &CheckReport) {
    let files = &report.incremental.files;
    let covered = files
        .iter()
        .filter(|f| f.has_coverage && f.coverage.lines.pct > 0.0)
        .count();
    let uncovered = files
        .iter()
        .filter(|f| !f.has_coverage || f.coverage.lines.pct == 0.0)
        .count();
    let type_only = report.incremental.type_only_files.len();

    println!();
    println!("{}", "Changed files".bold());
    println!("  total:        {}", report.changed_files.len());
    println!("  with tests:   {covered}");
    println!("  without tests: {uncovered}");
    if type_only > 0 {
        println!("  type-only:    {type_only} (nothing to test)");
    }
}

fn print_type_only_files(type_only_files: &[FileResult]) {
    if type_only_files.is_empty() {
        return;
    }
    println!();
    println!(
        "{}",
        "Type-only files (no executable code, skipped)".bold()
    );
    for file in type_only_files {
        println!("  - {}", file.file.dimmed());
    }
}

fn print_file_details(files: &[FileResult], line_threshold: f64) {
    if files.is_empty() {
        return;
    }
    println!();
    println!("{}", "File detail (least covered first)".bold());
    for file in files {
        let lines = &file.coverage.lines;
        let marker = if lines.pct >= line_threshold {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {marker} {}", file.file);
        println!(
            "      lines {} ({}/{}) | branches {} | functions {}",
            format_pct(lines.pct),
            lines.covered,
            lines.total,
            format_pct(file.coverage.branches.pct),
            format_pct(file.coverage.functions.pct),
        );
    }
}

fn print_summary(report: &CheckReport) {
    let summary = &report.incremental.summary;
    println!();
    println!("{}", "Incremental summary".bold());
    println!(
        "  lines:      {} ({}/{})",
        format_pct(summary.lines.pct),
        summary.lines.covered,
        summary.lines.total
    );
    println!(
        "  statements: {} ({}/{})",
        format_pct(summary.statements.pct),
        summary.statements.covered,
        summary.statements.total
    );
    println!(
        "  branches:   {} ({}/{})",
        format_pct(summary.branches.pct),
        summary.branches.covered,
        summary.branches.total
    );
    println!(
        "  functions:  {} ({}/{})",
        format_pct(summary.functions.pct),
        summary.functions.covered,
        summary.functions.total
    );
}

fn print_threshold_checks(report: &CheckReport) {
    if report.thresholds.details.is_empty() {
        return;
    }
    println!();
    println!("{}", "Threshold checks".bold());
    for detail in &report.thresholds.details {
        let (marker, status) = if detail.passed {
            ("✓".green(), "pass".green())
        } else {
            ("✗".red(), "fail".red())
        };
        println!(
            "  {marker} {}: {} (threshold {}) - {status}",
            detail.name,
            format_pct(detail.actual),
            format_pct(detail.threshold),
        );
    }
}

fn print_total(report: &CheckReport) {
    let Some(total) = &report.total else {
        return;
    };
    println!();
    println!("{}", "Whole-project coverage (reference only)".bold());
    println!(
        "  lines:     {} ({}/{})",
        format_pct(total.lines.pct),
        total.lines.covered,
        total.lines.total
    );
    println!(
        "  branches:  {} ({}/{})",
        format_pct(total.branches.pct),
        total.branches.covered,
        total.branches.total
    );
    println!(
        "  functions: {} ({}/{})",
        format_pct(total.functions.pct),
        total.functions.covered,
        total.functions.total
    );
}

fn print_verdict(report: &CheckReport) {
    println!();
    println!("{}", divider());
    if report.changed_files.is_empty() {
        println!(
            "{} no changed files matched the filter, nothing to check",
            "✓".green()
        );
    } else if report.passed {
        println!("{} incremental coverage check passed", "✓".green().bold());
    } else {
        println!("{} incremental coverage check failed", "✗".red().bold());
        if report.strict_mode {
            println!("  strict mode is on, exiting non-zero");
        }
    }
    println!();
}
