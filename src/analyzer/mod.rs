//! Main analysis orchestrator for Style Guardian
//!
//! CDD Principle: Domain Services - Analyzer orchestrates the whole validation workflow
//! - Coordinates file discovery, decoding, rule evaluation and result aggregation
//! - Provides clean interface for validating single files or directory trees
//! - Files are independent, so they may be checked in parallel; results merge before reporting

pub mod source;

use crate::config::StyleConfig;
use crate::domain::violations::{StyleError, StyleResult, ValidationReport, Violation};
use crate::patterns::{PathFilter, PatternEngine, RULE_CATALOG};
use rayon::prelude::*;
use source::SourceFile;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Main analyzer that orchestrates the entire validation process
#[derive(Debug)]
pub struct Analyzer {
    /// Configuration for this analysis
    config: StyleConfig,
    /// Rule engine holding every enabled rule
    pattern_engine: PatternEngine,
    /// Path filter for determining which files to analyze
    path_filter: PathFilter,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of files to analyze
    pub max_files: Option<usize>,
    /// Abort on the first unreadable file instead of skipping it
    pub fail_fast: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { parallel: true, max_files: None, fail_fast: false }
    }
}

/// What happened to one file
#[derive(Debug)]
pub enum FileOutcome {
    /// The file decoded and every enabled rule ran on it
    Checked(Vec<Violation>),
    /// The file is not text; it contributes nothing
    NotText,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: StyleConfig) -> StyleResult<Self> {
        config.validate()?;

        let pattern_engine = PatternEngine::from_config(&config.rules)?;
        let path_filter = PathFilter::from_config(&config)
            .map_err(|e| StyleError::config(format!("Failed to create path filter: {e}")))?;

        Ok(Self { config, pattern_engine, path_filter })
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> StyleResult<Self> {
        Self::new(StyleConfig::default())
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Check one file. Violations carry `path` relative to `root`.
    pub fn analyze_file(&self, root: &Path, path: &Path) -> StyleResult<FileOutcome> {
        let relative = path.strip_prefix(root).unwrap_or(path);

        let bytes = fs::read(path).map_err(|e| {
            StyleError::analysis(path.display().to_string(), format!("Failed to read file: {e}"))
        })?;

        let Some(file) = SourceFile::from_bytes(relative, &bytes) else {
            tracing::debug!("Skipping '{}': not valid UTF-8 text", relative.display());
            return Ok(FileOutcome::NotText);
        };

        let matches = self.pattern_engine.analyze_file(&file);
        Ok(FileOutcome::Checked(self.pattern_engine.matches_to_violations(matches)))
    }

    /// Check in-memory text as if it were the file at `relative`
    pub fn analyze_text<P: AsRef<Path>>(&self, relative: P, text: &str) -> Vec<Violation> {
        self.pattern_engine.check_text(relative, text)
    }

    /// Discover and check every selected file under `root`
    pub fn analyze_project<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> StyleResult<ValidationReport> {
        let root = root.as_ref();
        let start_time = Instant::now();

        let mut files = self.path_filter.find_files(root)?;
        if let Some(max_files) = options.max_files {
            files.truncate(max_files);
        }
        tracing::debug!("Checking {} files under '{}'", files.len(), root.display());

        let outcomes = if options.parallel && files.len() > 1 {
            files.par_iter().map(|path| (path, self.analyze_file(root, path))).collect::<Vec<_>>()
        } else {
            files.iter().map(|path| (path, self.analyze_file(root, path))).collect::<Vec<_>>()
        };

        let mut report = ValidationReport::new();
        let mut checked = 0;
        let mut skipped = 0;

        for (path, outcome) in outcomes {
            match outcome {
                Ok(FileOutcome::Checked(violations)) => {
                    checked += 1;
                    if !violations.is_empty() {
                        tracing::debug!("{}: {} violations", path.display(), violations.len());
                    }
                    for violation in violations {
                        report.add_violation(violation);
                    }
                }
                Ok(FileOutcome::NotText) => skipped += 1,
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to analyze {}: {}", display_relative(root, path), e);
                    skipped += 1;
                }
            }
        }

        report.set_files_analyzed(checked);
        report.set_files_skipped(skipped);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        report.sort_violations();

        tracing::debug!(
            "Checked {} files ({} skipped), {} violations",
            checked,
            skipped,
            report.violations.len()
        );

        Ok(report)
    }

    /// Get configuration fingerprint
    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    /// Get statistics about the configured rules
    pub fn rule_stats(&self) -> RuleStats {
        let enabled_rules = self.pattern_engine.rule_ids().len();
        RuleStats { enabled_rules, disabled_rules: RULE_CATALOG.len() - enabled_rules }
    }
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Statistics about configured rules
#[derive(Debug, Default)]
pub struct RuleStats {
    pub enabled_rules: usize,
    pub disabled_rules: usize,
}

impl RuleStats {
    pub fn total_rules(&self) -> usize {
        self.enabled_rules + self.disabled_rules
    }
}
