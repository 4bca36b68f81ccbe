//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-module blocks with tag, Forge version and dependency status
//! - Skipped module and invalid tag listings
//! - A closing verdict line

use crate::domain::{DependencyCheck, DependencyFinding, Diagnostic};
use crate::output::{OutputFormatter, Verbosity};
use crate::report::Report;
use colored::Colorize;
use std::io::Write;

/// Width of the separator printed after each module block
const SEPARATOR_WIDTH: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format a single dependency line
    fn format_dependency(
        &self,
        check: &DependencyCheck,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let status = match &check.finding {
            DependencyFinding::Satisfied => String::new(),
            DependencyFinding::NotFoundInManifest => format!(" {}", self.error("[Not Found]")),
            DependencyFinding::ConstraintViolated { provided_version } => format!(
                " {}",
                self.warning(&format!("[Invalid - Provided:{}]", provided_version))
            ),
        };
        writeln!(
            writer,
            "    - {} ({}){}",
            check.name, check.requirement, status
        )
    }

    /// Format one module block
    fn format_diagnostic(
        &self,
        diagnostic: &Diagnostic,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let outdated = if diagnostic.outdated {
            format!(" {}", self.warning("[Outdated]"))
        } else {
            String::new()
        };

        let released = match (self.verbosity, diagnostic.latest_released_at) {
            (Verbosity::Verbose, Some(at)) => {
                format!(" {}", self.dimmed(&format!("({})", at.format("%Y/%m/%d"))))
            }
            _ => String::new(),
        };

        if self.color {
            writeln!(writer, "Module: {}", diagnostic.module.bold())?;
        } else {
            writeln!(writer, "Module: {}", diagnostic.module)?;
        }
        writeln!(writer, "  Puppetfile Tag: {}", diagnostic.pinned_version)?;
        writeln!(
            writer,
            "  Forge Version: {}{}{}",
            diagnostic.latest_version, released, outdated
        )?;
        writeln!(writer, "  Forge Dependencies:")?;
        for check in &diagnostic.dependencies {
            self.format_dependency(check, writer)?;
        }
        writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    /// Format skipped modules and invalid tags
    fn format_exclusions(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        if !report.skipped.is_empty() {
            writeln!(writer, "{}", self.dimmed("Skipped (not checked):"))?;
            for skipped in &report.skipped {
                if self.verbosity == Verbosity::Verbose {
                    writeln!(writer, "  {} ({})", skipped.module, skipped.reason)?;
                } else {
                    writeln!(writer, "  {}", skipped.module)?;
                }
            }
        }

        if !report.invalid_tags.is_empty() {
            writeln!(writer, "{}", self.warning("Invalid version tags:"))?;
            for invalid in &report.invalid_tags {
                writeln!(writer, "  {} ('{}')", invalid.name, invalid.raw_tag)?;
            }
        }

        Ok(())
    }

    /// Format the closing verdict line
    fn format_verdict(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        if report.verdict.is_pass() {
            let line = "Puppetfile dependencies are valid.";
            if self.color {
                writeln!(writer, "{}", line.green())
            } else {
                writeln!(writer, "{}", line)
            }
        } else {
            writeln!(
                writer,
                "{}",
                self.error("Puppetfile has dependency errors. Please correct them.")
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for diagnostic in report.entries() {
                self.format_diagnostic(diagnostic, writer)?;
            }
            self.format_exclusions(report, writer)?;
        }
        self.format_verdict(report, writer)
    }
}
