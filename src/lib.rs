//! Style Guardian - Source style conformance checking for C and C++ trees
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Pure domain logic separated from infrastructure concerns
//! - Scanning, boundary detection and rules never touch the file system
//! - The validator facade ties configuration, analysis and reporting together

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod patterns;
pub mod report;
pub mod scanner;
pub mod structure;

// Re-export main types for convenient access
pub use domain::violations::{
    StyleError, StyleResult, ValidationReport, ValidationSummary, Violation,
};

pub use config::{ConfigBuilder, PointerStyle, RuleConfig, StyleConfig, DEFAULT_CONFIG_FILE};

pub use analyzer::{AnalysisOptions, Analyzer, RuleStats};

pub use patterns::{rule_info, RuleInfo, RULE_CATALOG};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

use analyzer::FileOutcome;
use std::path::{Path, PathBuf};

/// Main validator providing high-level validation operations
#[derive(Debug)]
pub struct StyleValidator {
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
}

impl StyleValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: StyleConfig) -> StyleResult<Self> {
        let analyzer = Analyzer::new(config)?;
        Ok(Self { analyzer, report_formatter: ReportFormatter::default() })
    }

    /// Create a validator with default configuration
    pub fn new() -> StyleResult<Self> {
        Self::new_with_config(StyleConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> StyleResult<Self> {
        let config = StyleConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Create a validator from the configuration file at the root of a tree
    pub fn for_root<P: AsRef<Path>>(root: P) -> StyleResult<Self> {
        Self::from_config_file(default_config_path(root))
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    /// Validate a single file. Violations are reported relative to `root`.
    pub fn validate_file(&self, root: &Path, file_path: &Path) -> StyleResult<ValidationReport> {
        let mut report = ValidationReport::new();

        match self.analyzer.analyze_file(root, file_path)? {
            FileOutcome::Checked(violations) => {
                for violation in violations {
                    report.add_violation(violation);
                }
                report.set_files_analyzed(1);
            }
            FileOutcome::NotText => report.set_files_skipped(1),
        }

        report.set_config_fingerprint(self.analyzer.config_fingerprint());
        report.sort_violations();
        Ok(report)
    }

    /// Validate in-memory source text
    pub fn validate_text<P: AsRef<Path>>(&self, relative: P, text: &str) -> Vec<Violation> {
        self.analyzer.analyze_text(relative, text)
    }

    /// Validate entire directory tree
    pub fn validate_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> StyleResult<ValidationReport> {
        self.analyzer.analyze_project(root, options)
    }

    /// Format a validation report for output
    pub fn format_report(&self, report: &ValidationReport, format: OutputFormat) -> StyleResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// Get rule statistics
    pub fn rule_statistics(&self) -> RuleStats {
        self.analyzer.rule_stats()
    }

    /// The configuration in effect
    pub fn config(&self) -> &StyleConfig {
        self.analyzer.config()
    }
}

/// Location of the configuration file for a checked tree
pub fn default_config_path<P: AsRef<Path>>(root: P) -> PathBuf {
    root.as_ref().join(DEFAULT_CONFIG_FILE)
}

/// Convenience function to create a validator with default configuration
pub fn create_validator() -> StyleResult<StyleValidator> {
    StyleValidator::new()
}

/// Convenience function to validate a directory with default settings
pub fn validate_directory<P: AsRef<Path>>(directory: P) -> StyleResult<ValidationReport> {
    let validator = StyleValidator::new()?;
    validator.validate_directory(directory, &AnalysisOptions::default())
}
