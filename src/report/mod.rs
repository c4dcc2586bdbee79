//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - The human format is the `path:line: message` contract followed by one summary line

use crate::domain::violations::{StyleError, StyleResult, ValidationReport, Violation};
use serde_json::Value as JsonValue;
use std::io::Write;
use std::str::FromStr;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `path:line: message` lines and a summary
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// GitHub Actions format for workflow integration
    GitHub,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "github"]
    }
}

impl FromStr for OutputFormat {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "github" => Ok(Self::GitHub),
            other => Err(StyleError::config(format!(
                "Unknown output format '{other}', expected one of: {}",
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, max_violations: None }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a validation report in the specified format
    pub fn format_report(&self, report: &ValidationReport, format: OutputFormat) -> StyleResult<String> {
        let shown = self.limit_violations(&report.violations);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, shown)),
            OutputFormat::Json => self.format_json(report, shown),
            OutputFormat::GitHub => Ok(self.format_github(shown)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> StyleResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn limit_violations<'a>(&self, violations: &'a [Violation]) -> &'a [Violation] {
        match self.options.max_violations {
            Some(max) if max < violations.len() => &violations[..max],
            _ => violations,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Format report in human-readable format
    fn format_human(&self, report: &ValidationReport, violations: &[Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            let location = format!("{}:{}:", violation.display_path(), violation.line_number);
            output.push_str(&format!("{} {}\n", self.paint("2", &location), violation.message));
        }

        let hidden = report.violations.len() - violations.len();
        if hidden > 0 {
            output.push_str(&format!("... and {hidden} more violations\n"));
        }

        output.push_str(&self.format_summary(report));
        output
    }

    /// Format report in JSON format
    fn format_json(&self, report: &ValidationReport, violations: &[Violation]) -> StyleResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule_id": v.rule_id,
                    "file_path": v.display_path(),
                    "line_number": v.line_number,
                    "message": v.message,
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "passed": report.passed(),
            "violations": json_violations,
            "summary": {
                "total_files": report.summary.total_files,
                "skipped_files": report.summary.skipped_files,
                "files_with_violations": report.summary.files_with_violations,
                "total_violations": report.violations.len(),
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339(),
            },
            "config_fingerprint": report.config_fingerprint,
        });

        serde_json::to_string_pretty(&json_report)
            .map(|json| json + "\n")
            .map_err(|e| StyleError::config(format!("JSON serialization failed: {e}")))
    }

    /// Format report for GitHub Actions
    fn format_github(&self, violations: &[Violation]) -> String {
        violations
            .iter()
            .map(|v| {
                format!(
                    "::error file={},line={},title={}::{}\n",
                    v.display_path(),
                    v.line_number,
                    v.rule_id,
                    v.message
                )
            })
            .collect()
    }

    /// Format the summary line
    fn format_summary(&self, report: &ValidationReport) -> String {
        let files = report.summary.total_files;
        let skipped = match report.summary.skipped_files {
            0 => String::new(),
            n => format!(", {n} skipped"),
        };

        if report.passed() {
            format!(
                "{} ({} checked{})\n",
                self.paint("32", "style-guardian: OK"),
                plural(files, "file"),
                skipped
            )
        } else {
            format!(
                "\n{} ({} in {}, {} checked{})\n",
                self.paint("31", "style-guardian: FAILED"),
                plural(report.violations.len(), "violation"),
                plural(report.summary.files_with_violations, "file"),
                plural(files, "file"),
                skipped
            )
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
