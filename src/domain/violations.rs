//! Core domain models for style violations and validation results
//!
//! Architecture: Rich Domain Models - Violations are values with behavior, not just data
//! - A violation always knows its file, its 1-based line and the rule that raised it
//! - ValidationReport acts as an aggregate root merging per-file results into one verdict
//! - The error taxonomy separates fatal configuration problems from recoverable file issues

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One line of one file that breaks one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that detected this violation
    pub rule_id: String,
    /// File path, relative to the checked root
    pub file_path: PathBuf,
    /// 1-based line the diagnostic points at
    pub line_number: u32,
    /// Text printed after `path:line: `
    pub message: String,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        file_path: PathBuf,
        line_number: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            file_path,
            line_number,
            message: message.into(),
        }
    }

    /// Render as `path:line: message`, with `/` separators on every platform
    pub fn format_display(&self) -> String {
        format!(
            "{}:{}: {}",
            self.display_path(),
            self.line_number,
            self.message
        )
    }

    /// File path with forward slashes
    pub fn display_path(&self) -> String {
        self.file_path.to_string_lossy().replace('\\', "/")
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Number of files handed to the rule engine
    pub total_files: usize,
    /// Files skipped because they were not text or could not be read
    pub skipped_files: usize,
    /// Number of distinct files with at least one violation
    pub files_with_violations: usize,
    /// Wall-clock duration of the run
    pub execution_time_ms: u64,
    /// When the run started
    pub validated_at: DateTime<Utc>,
}

/// Result of one run over a tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub summary: ValidationSummary,
    /// Fingerprint of the configuration in effect
    pub config_fingerprint: Option<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: ValidationSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Overall verdict: a run passes iff no file produced a violation
    pub fn passed(&self) -> bool {
        !self.has_violations()
    }

    /// Violations raised by one rule
    pub fn violations_for_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }

    /// Record how many files the rules ran on
    pub fn set_files_analyzed(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    /// Set the number of files skipped
    pub fn set_files_skipped(&mut self, count: usize) {
        self.summary.skipped_files = count;
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Fold a partial report (for example one subtree) into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.total_files += other.summary.total_files;
        self.summary.skipped_files += other.summary.skipped_files;
    }

    /// Order violations by file path for stable output.
    ///
    /// The sort is stable, so within a file the order in which the rules
    /// produced their violations is kept.
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        self.refresh_file_count();
    }

    fn refresh_file_count(&mut self) {
        let mut files: Vec<&PathBuf> = self.violations.iter().map(|v| &v.file_path).collect();
        files.dedup();
        self.summary.files_with_violations = files.len();
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Failures that stop a file or a whole run
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Missing, unreadable, malformed or inconsistent configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Underlying I/O failure
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A rule's regular expression did not compile
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// One file could not be read
    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },
}

impl StyleError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to the configuration class
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Pattern { .. })
    }
}

/// Result type for style-guardian operations
pub type StyleResult<T> = Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_violation_creation() {
        let violation = Violation::new(
            "trailing_whitespace",
            PathBuf::from("src/main.cpp"),
            7,
            "trailing whitespace",
        );

        assert_eq!(violation.rule_id, "trailing_whitespace");
        assert_eq!(violation.file_path, Path::new("src/main.cpp"));
        assert_eq!(violation.line_number, 7);
        assert_eq!(violation.format_display(), "src/main.cpp:7: trailing whitespace");
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();
        assert!(report.passed());

        report.add_violation(Violation::new(
            "rule1",
            PathBuf::from("src/b.cpp"),
            3,
            "first",
        ));
        report.add_violation(Violation::new(
            "rule2",
            PathBuf::from("src/a.cpp"),
            9,
            "second",
        ));
        report.add_violation(Violation::new(
            "rule3",
            PathBuf::from("src/b.cpp"),
            1,
            "third",
        ));
        report.sort_violations();

        assert!(report.has_violations());
        assert!(!report.passed());
        assert_eq!(report.summary.files_with_violations, 2);
        assert_eq!(report.violations[0].file_path, Path::new("src/a.cpp"));
        // stable within a file: rule order kept even though line 3 > line 1
        assert_eq!(report.violations[1].rule_id, "rule1");
        assert_eq!(report.violations[2].rule_id, "rule3");
        assert_eq!(report.violations_for_rule("rule2").count(), 1);
    }

    #[test]
    fn test_merge_reports() {
        let mut first = ValidationReport::new();
        first.set_files_analyzed(2);
        let mut second = ValidationReport::new();
        second.set_files_analyzed(3);
        second.set_files_skipped(1);
        second.add_violation(Violation::new("r", PathBuf::from("x.h"), 1, "m"));

        first.merge(second);

        assert_eq!(first.summary.total_files, 5);
        assert_eq!(first.summary.skipped_files, 1);
        assert_eq!(first.violations.len(), 1);
    }

    #[test]
    fn test_error_classes() {
        assert!(StyleError::config("bad").is_configuration());
        assert!(StyleError::pattern("bad").is_configuration());
        assert!(!StyleError::analysis("a.c", "gone").is_configuration());
    }
}
