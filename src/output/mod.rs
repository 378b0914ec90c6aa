//! Report rendering.
//!
//! A [`CheckReport`] can be rendered to the terminal, as JSON for machine
//! consumption, or as Markdown for PR comments and job summaries.

pub mod report;
mod terminal;

pub use report::CheckReport;
pub use terminal::TerminalWriter;

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &CheckReport) -> Result<()>;
}

/// Percentages render without a trailing `.0` (80, 33.33).
pub(crate) fn format_pct(value: f64) -> String {
    format!("{value}%")
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &CheckReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, report: &CheckReport) -> Result<()> {
        writeln!(self.writer, "# Incremental Coverage Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Mode: {} | Branch: `{}` | Commit: `{}`",
            report.context.mode.description(),
            report.context.branch,
            report.context.commit
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &CheckReport) -> Result<()> {
        if report.thresholds.details.is_empty() {
            writeln!(
                self.writer,
                "No changed files matched the filter; nothing to check."
            )?;
            writeln!(self.writer)?;
            return Ok(());
        }

        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Coverage | Threshold | Status |")?;
        writeln!(self.writer, "|--------|----------|-----------|--------|")?;
        for detail in &report.thresholds.details {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                detail.name,
                format_pct(detail.actual),
                format_pct(detail.threshold),
                if detail.passed { "pass" } else { "**fail**" }
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_files(&mut self, report: &CheckReport) -> Result<()> {
        if !report.incremental.files.is_empty() {
            writeln!(self.writer, "## Changed files")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| File | Lines | Branches | Functions |")?;
            writeln!(self.writer, "|------|-------|----------|-----------|")?;
            for file in &report.incremental.files {
                writeln!(
                    self.writer,
                    "| `{}` | {} ({}/{}) | {} | {} |",
                    file.file,
                    format_pct(file.coverage.lines.pct),
                    file.coverage.lines.covered,
                    file.coverage.lines.total,
                    format_pct(file.coverage.branches.pct),
                    format_pct(file.coverage.functions.pct),
                )?;
            }
            writeln!(self.writer)?;
        }

        if !report.incremental.type_only_files.is_empty() {
            writeln!(self.writer, "Type-only files, skipped:")?;
            writeln!(self.writer)?;
            for file in &report.incremental.type_only_files {
                writeln!(self.writer, "- `{}`", file.file)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_total(&mut self, report: &CheckReport) -> Result<()> {
        let Some(total) = &report.total else {
            return Ok(());
        };
        writeln!(self.writer, "## Whole-project coverage (reference)")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Lines {} | Branches {} | Functions {}",
            format_pct(total.lines.pct),
            format_pct(total.branches.pct),
            format_pct(total.functions.pct),
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_verdict(&mut self, report: &CheckReport) -> Result<()> {
        let verdict = if report.passed {
            "**Result: passed**"
        } else {
            "**Result: failed**"
        };
        writeln!(self.writer, "{verdict}")?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &CheckReport) -> Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_files(report)?;
        self.write_total(report)?;
        self.write_verdict(report)?;
        Ok(())
    }
}

/// Construct the writer for a format, targeting stdout or a file.
///
/// The terminal writer talks to stdout directly; redirecting it to a file
/// would embed escape sequences, so that combination is rejected.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<Box<dyn OutputWriter>> {
    match (format, output) {
        (OutputFormat::Terminal, None) => Ok(Box::new(TerminalWriter::new())),
        (OutputFormat::Terminal, Some(_)) => Err(anyhow::anyhow!(
            "terminal output writes to stdout; use --format json or markdown with --output"
        )),
        (OutputFormat::Json, None) => Ok(Box::new(JsonWriter::new(std::io::stdout()))),
        (OutputFormat::Json, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(JsonWriter::new(file)))
        }
        (OutputFormat::Markdown, None) => Ok(Box::new(MarkdownWriter::new(std::io::stdout()))),
        (OutputFormat::Markdown, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(MarkdownWriter::new(file)))
        }
    }
}
