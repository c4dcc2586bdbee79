//! Configuration loading and management for Style Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates the external YAML format
//! - Raw YAML documents are converted to an immutable rule snapshot
//! - Default values live here, in the domain, not in the command line layer
//! - The license text is a named constant injected into the snapshot at construction

use crate::domain::violations::{StyleError, StyleResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Substring every checked file must carry in its license header
pub const DEFAULT_LICENSE_TEXT: &str = "GNU General Public License";

/// File name looked up under the checked root when no config is given
pub const DEFAULT_CONFIG_FILE: &str = ".style-guardian.yml";

/// Main configuration structure for Style Guardian
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Directories (relative to the root) walked for candidate files
    pub include: Vec<String>,
    /// Path fragments or glob patterns excluding files from the run
    pub exclude: Vec<String>,
    /// File extensions to check, with or without the leading dot
    pub extensions: Vec<String>,
    /// Rule toggles and thresholds
    pub rules: RuleConfig,
}

/// Accepted spacing for pointer and reference declarators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PointerStyle {
    /// `Type *name` / `Type &name`
    TypeSpaceStarvar,
    /// No declarator checks
    Any,
}

/// Immutable snapshot of every rule toggle and threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(default)]
pub struct RuleConfig {
    /// Maximum characters per line, 0 disables
    pub max_line_length: usize,
    pub forbid_trailing_whitespace: bool,
    pub require_newline_at_eof: bool,
    /// Leading whitespace may only contain tabs
    pub indentation_tabs_only: bool,
    /// Columns a tab counts for when measuring indentation
    pub tab_width: usize,
    /// Indentation must be a multiple of this many columns, 0 disables
    pub indent_multiple_of: usize,
    pub require_space_after_keywords: bool,
    pub require_space_before_keywords: bool,
    pub require_space_around_operators: bool,
    pub require_space_around_braces: bool,
    /// Flag `} ;`, `} ,` and `} )`
    pub forbid_space_between_brace_and_terminator: bool,
    pub require_blank_line_before_includes: bool,
    pub require_blank_line_after_includes: bool,
    pub require_blank_lines_around_definitions: bool,
    pub pointer_reference_style: PointerStyle,
    /// Required suffix for `typedef struct` names, empty disables
    pub typedef_struct_suffix: String,
    /// Keywords whose declared name must start with an uppercase letter
    pub capitalized_type_keywords: Vec<String>,
    /// Older on/off switch for `class` names, folded into
    /// `capitalized_type_keywords` on load
    #[serde(skip_serializing)]
    class_name_capitalized: Option<bool>,
    pub require_license_header: bool,
    pub license_required_substring: String,
    /// Number of leading lines searched for the license substring
    pub license_scan_lines: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_line_length: 88,
            forbid_trailing_whitespace: true,
            require_newline_at_eof: true,
            indentation_tabs_only: true,
            tab_width: 2,
            indent_multiple_of: 2,
            require_space_after_keywords: true,
            require_space_before_keywords: true,
            require_space_around_operators: true,
            require_space_around_braces: true,
            forbid_space_between_brace_and_terminator: true,
            require_blank_line_before_includes: true,
            require_blank_line_after_includes: true,
            require_blank_lines_around_definitions: true,
            pointer_reference_style: PointerStyle::TypeSpaceStarvar,
            typedef_struct_suffix: "_t".to_string(),
            capitalized_type_keywords: vec!["class".to_string()],
            class_name_capitalized: None,
            require_license_header: true,
            license_required_substring: DEFAULT_LICENSE_TEXT.to_string(),
            license_scan_lines: 20,
        }
    }
}

impl RuleConfig {
    fn fold_legacy_keys(&mut self) {
        match self.class_name_capitalized.take() {
            Some(false) => self.capitalized_type_keywords.retain(|k| k != "class"),
            Some(true) if !self.capitalized_type_keywords.iter().any(|k| k == "class") => {
                self.capitalized_type_keywords.push("class".to_string());
            }
            _ => {}
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            include: vec!["src".to_string(), "include".to_string(), "tests".to_string()],
            exclude: vec![
                "build".to_string(),
                ".git".to_string(),
                "third_party".to_string(),
                "vendor".to_string(),
                "external".to_string(),
            ],
            extensions: vec![
                ".h".to_string(),
                ".hpp".to_string(),
                ".c".to_string(),
                ".cc".to_string(),
                ".cpp".to_string(),
            ],
            rules: RuleConfig::default(),
        }
    }
}

impl StyleConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StyleResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            StyleError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = Self::parse(&contents).map_err(|e| {
            StyleError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> StyleResult<Self> {
        let config = Self::parse(content)
            .map_err(|e| StyleError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty or comment-only document means "all defaults"
        if content.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        config.rules.fold_legacy_keys();
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> StyleResult<()> {
        if self.rules.tab_width == 0 {
            return Err(StyleError::config("rules.tab_width must be at least 1"));
        }

        if self.normalized_extensions().is_empty() {
            return Err(StyleError::config("extensions must list at least one file extension"));
        }

        if self.rules.require_license_header && self.rules.license_required_substring.is_empty() {
            return Err(StyleError::config(
                "rules.license_required_substring is empty while the license rule is enabled",
            ));
        }

        for keyword in &self.rules.capitalized_type_keywords {
            if keyword.is_empty() || !keyword.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(StyleError::config(format!(
                    "Invalid keyword '{keyword}' in rules.capitalized_type_keywords"
                )));
            }
        }

        Ok(())
    }

    /// Extensions without their leading dot, empty entries dropped
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> StyleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StyleError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.include.hash(&mut hasher);
        self.exclude.hash(&mut hasher);
        let mut extensions = self.normalized_extensions();
        extensions.sort();
        extensions.hash(&mut hasher);
        self.rules.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: StyleConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: StyleConfig::default() }
    }

    /// Replace the include directories
    pub fn include_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.include = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Add an exclusion fragment or glob
    pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
        self.config.exclude.push(fragment.into());
        self
    }

    /// Replace the extension set
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Adjust the rule snapshot
    pub fn rules(mut self, update: impl FnOnce(&mut RuleConfig)) -> Self {
        update(&mut self.config.rules);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> StyleResult<StyleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StyleConfig::default();
        assert_eq!(config.rules.max_line_length, 88);
        assert!(config.rules.indentation_tabs_only);
        assert_eq!(config.rules.indent_multiple_of, 2);
        assert_eq!(config.rules.license_required_substring, DEFAULT_LICENSE_TEXT);
        assert_eq!(config.normalized_extensions(), vec!["h", "hpp", "c", "cc", "cpp"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
# project settings
include:
  - src
extensions:
  - ".cpp"
rules:
  max_line_length: 100
  indentation_tabs_only: false
  pointer_reference_style: any
  typedef_struct_suffix: "_s"
"#;
        let config = StyleConfig::load_from_str(yaml).unwrap();

        assert_eq!(config.include, vec!["src"]);
        assert_eq!(config.exclude, StyleConfig::default().exclude);
        assert_eq!(config.rules.max_line_length, 100);
        assert!(!config.rules.indentation_tabs_only);
        assert_eq!(config.rules.pointer_reference_style, PointerStyle::Any);
        assert_eq!(config.rules.typedef_struct_suffix, "_s");
        assert_eq!(config.rules.tab_width, 2);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = StyleConfig::load_from_str("# nothing here\n\n").unwrap();
        assert_eq!(config.rules, RuleConfig::default());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(StyleConfig::load_from_str("rules:\n  tab_width: 0\n").is_err());
        assert!(StyleConfig::load_from_str("extensions: []\n").is_err());
        assert!(StyleConfig::load_from_str("rules:\n  license_required_substring: \"\"\n").is_err());
        assert!(StyleConfig::load_from_str("rules:\n  max_line_length: lots\n").is_err());
        assert!(StyleConfig::load_from_str("rules:\n  pointer_reference_style: sideways\n").is_err());
    }

    #[test]
    fn test_class_name_capitalized_switch() {
        let config = StyleConfig::load_from_str("rules:\n  class_name_capitalized: false\n").unwrap();
        assert!(config.rules.capitalized_type_keywords.is_empty());
        let rule = crate::patterns::rule_info("type_name_capitalization").unwrap();
        assert!(!rule.is_enabled(&config.rules));

        let yaml = "rules:\n  class_name_capitalized: true\n  capitalized_type_keywords: [struct]\n";
        let config = StyleConfig::load_from_str(yaml).unwrap();
        assert_eq!(config.rules.capitalized_type_keywords, vec!["struct", "class"]);

        let config = StyleConfig::load_from_str("rules:\n  class_name_capitalized: true\n").unwrap();
        assert_eq!(config.rules, RuleConfig::default());
        assert!(!config.to_json().unwrap().contains("class_name_capitalized"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = StyleConfig::load_from_file(temp_dir.path().join("absent.yml")).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("absent.yml"));
    }

    #[test]
    fn test_builder_and_fingerprint() {
        let config = ConfigBuilder::new()
            .include_dirs(["lib"])
            .exclude("generated")
            .rules(|r| r.max_line_length = 120)
            .build()
            .unwrap();

        assert_eq!(config.include, vec!["lib"]);
        assert!(config.exclude.contains(&"generated".to_string()));
        assert_eq!(config.fingerprint(), config.clone().fingerprint());
        assert_ne!(config.fingerprint(), StyleConfig::default().fingerprint());

        let json = config.to_json().unwrap();
        assert!(json.contains("\"max_line_length\": 120"));
    }
}
