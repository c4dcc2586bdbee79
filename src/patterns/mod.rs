//! Rule engine for detecting style violations
//!
//! Architectural Principle: Service Layer - The pattern engine runs every enabled rule over a file
//! - Each rule implements the StyleRule trait and reads nothing but the file and its own settings
//! - Rules are registered in catalog order, which fixes the per-file diagnostic order
//! - Rule matches are translated to violations at the boundary

pub mod layout;
pub mod naming;
pub mod path_filter;
pub mod spacing;
pub mod whitespace;

use crate::analyzer::source::SourceFile;
use crate::config::{PointerStyle, RuleConfig};
use crate::domain::violations::{StyleError, StyleResult, Violation};
use regex::Regex;
use std::path::{Path, PathBuf};

pub use path_filter::PathFilter;

/// A single line finding produced by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// 1-based line number
    pub line_number: u32,
    pub message: String,
}

impl RuleMatch {
    /// Finding for the 0-based line `index`
    pub fn at(index: usize, message: impl Into<String>) -> Self {
        Self { line_number: line_number(index), message: message.into() }
    }
}

/// A match found by the engine, tagged with its rule and file
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub rule_id: String,
    pub file_path: PathBuf,
    pub line_number: u32,
    pub message: String,
}

/// An independent style check
pub trait StyleRule: Send + Sync + std::fmt::Debug {
    /// Identifier reported with every violation
    fn id(&self) -> &'static str;

    /// Findings for one file, in line order
    fn check(&self, file: &SourceFile) -> Vec<RuleMatch>;
}

/// Catalog entry describing one rule
pub struct RuleInfo {
    pub id: &'static str,
    pub description: &'static str,
    /// Configuration key under `rules:` that turns the rule on or off
    pub config_key: &'static str,
    enabled: fn(&RuleConfig) -> bool,
    build: fn(&RuleConfig) -> StyleResult<Box<dyn StyleRule>>,
}

impl RuleInfo {
    pub fn is_enabled(&self, rules: &RuleConfig) -> bool {
        (self.enabled)(rules)
    }
}

impl std::fmt::Debug for RuleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleInfo").field("id", &self.id).field("config_key", &self.config_key).finish()
    }
}

/// Every rule, in execution order
pub static RULE_CATALOG: &[RuleInfo] = &[
    RuleInfo {
        id: "license_header",
        description: "The file must open with a block comment carrying the required license text",
        config_key: "require_license_header",
        enabled: |r: &RuleConfig| r.require_license_header,
        build: |r: &RuleConfig| boxed(layout::LicenseHeader::from_config(r)),
    },
    RuleInfo {
        id: "newline_at_eof",
        description: "A non-empty file must end with a newline",
        config_key: "require_newline_at_eof",
        enabled: |r: &RuleConfig| r.require_newline_at_eof,
        build: |r: &RuleConfig| boxed(layout::NewlineAtEof::from_config(r)),
    },
    RuleInfo {
        id: "trailing_whitespace",
        description: "Lines must not end with spaces or tabs",
        config_key: "forbid_trailing_whitespace",
        enabled: |r: &RuleConfig| r.forbid_trailing_whitespace,
        build: |r: &RuleConfig| boxed(whitespace::TrailingWhitespace::from_config(r)),
    },
    RuleInfo {
        id: "max_line_length",
        description: "Lines must not exceed the configured number of characters",
        config_key: "max_line_length",
        enabled: |r: &RuleConfig| r.max_line_length > 0,
        build: |r: &RuleConfig| boxed(whitespace::MaxLineLength::from_config(r)),
    },
    RuleInfo {
        id: "indentation_character",
        description: "Indentation must use tabs only",
        config_key: "indentation_tabs_only",
        enabled: |r: &RuleConfig| r.indentation_tabs_only,
        build: |r: &RuleConfig| boxed(whitespace::IndentationCharacter::from_config(r)),
    },
    RuleInfo {
        id: "indentation_multiple",
        description: "Indentation width in columns must be a multiple of the configured unit",
        config_key: "indent_multiple_of",
        enabled: |r: &RuleConfig| r.indent_multiple_of > 0,
        build: |r: &RuleConfig| boxed(whitespace::IndentationMultiple::from_config(r)),
    },
    RuleInfo {
        id: "operator_spacing",
        description: "Comparison, arithmetic, assignment and logical operators need surrounding spaces",
        config_key: "require_space_around_operators",
        enabled: |r: &RuleConfig| r.require_space_around_operators,
        build: |r: &RuleConfig| boxed(spacing::OperatorSpacing::from_config(r)),
    },
    RuleInfo {
        id: "keyword_spacing_after",
        description: "Control keywords must be followed by a space before '('",
        config_key: "require_space_after_keywords",
        enabled: |r: &RuleConfig| r.require_space_after_keywords,
        build: |r: &RuleConfig| boxed(spacing::KeywordSpacingAfter::from_config(r)),
    },
    RuleInfo {
        id: "keyword_spacing_before",
        description: "Keywords must not directly follow ';', '}', ')' or ']'",
        config_key: "require_space_before_keywords",
        enabled: |r: &RuleConfig| r.require_space_before_keywords,
        build: |r: &RuleConfig| boxed(spacing::KeywordSpacingBefore::from_config(r)),
    },
    RuleInfo {
        id: "brace_spacing",
        description: "Braces must be separated from surrounding code by a space",
        config_key: "require_space_around_braces",
        enabled: |r: &RuleConfig| r.require_space_around_braces,
        build: |r: &RuleConfig| boxed(spacing::BraceSpacing::from_config(r)),
    },
    RuleInfo {
        id: "pointer_reference_style",
        description: "Pointer and reference declarators must be written 'Type *name' / 'Type &name'",
        config_key: "pointer_reference_style",
        enabled: |r: &RuleConfig| r.pointer_reference_style == PointerStyle::TypeSpaceStarvar,
        build: |r: &RuleConfig| boxed(naming::PointerReferenceStyle::from_config(r)),
    },
    RuleInfo {
        id: "typedef_struct_suffix",
        description: "Names introduced by 'typedef struct' must end with the configured suffix",
        config_key: "typedef_struct_suffix",
        enabled: |r: &RuleConfig| !r.typedef_struct_suffix.is_empty(),
        build: |r: &RuleConfig| boxed(naming::TypedefStructSuffix::from_config(r)),
    },
    RuleInfo {
        id: "type_name_capitalization",
        description: "Type names introduced by the configured keywords must start with a capital letter",
        config_key: "capitalized_type_keywords",
        enabled: |r: &RuleConfig| !r.capitalized_type_keywords.is_empty(),
        build: |r: &RuleConfig| boxed(naming::TypeNameCapitalization::from_config(r)),
    },
    RuleInfo {
        id: "include_block_spacing",
        description: "The block of #include lines must be separated from other code by blank lines",
        config_key: "require_blank_line_before_includes / require_blank_line_after_includes",
        enabled: |r: &RuleConfig| {
            r.require_blank_line_before_includes || r.require_blank_line_after_includes
        },
        build: |r: &RuleConfig| boxed(layout::IncludeBlockSpacing::from_config(r)),
    },
    RuleInfo {
        id: "definition_spacing",
        description: "Function and type definitions must be surrounded by blank lines",
        config_key: "require_blank_lines_around_definitions",
        enabled: |r: &RuleConfig| r.require_blank_lines_around_definitions,
        build: |r: &RuleConfig| boxed(layout::DefinitionSpacing::from_config(r)),
    },
];

/// Look up a rule by id
pub fn rule_info(id: &str) -> Option<&'static RuleInfo> {
    RULE_CATALOG.iter().find(|info| info.id == id)
}

/// Runs the enabled rules over source files
#[derive(Debug, Default)]
pub struct PatternEngine {
    rules: Vec<Box<dyn StyleRule>>,
}

impl PatternEngine {
    /// Create an engine with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine holding every rule the configuration enables
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        let mut engine = Self::new();

        for info in RULE_CATALOG.iter().filter(|info| info.is_enabled(rules)) {
            tracing::debug!("Adding rule '{}'", info.id);
            engine.add_rule((info.build)(rules)?);
        }

        Ok(engine)
    }

    /// Append a rule; it runs after every rule added before it
    pub fn add_rule(&mut self, rule: Box<dyn StyleRule>) {
        self.rules.push(rule);
    }

    /// Ids of the registered rules, in execution order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Analyze a file and return all rule matches
    pub fn analyze_file(&self, file: &SourceFile) -> Vec<PatternMatch> {
        let mut matches = Vec::new();

        for rule in &self.rules {
            let found = rule.check(file);
            if !found.is_empty() {
                tracing::debug!(
                    "Rule '{}' found {} matches in '{}'",
                    rule.id(),
                    found.len(),
                    file.path().display()
                );
            }

            matches.extend(found.into_iter().map(|m| PatternMatch {
                rule_id: rule.id().to_string(),
                file_path: file.path().to_path_buf(),
                line_number: m.line_number,
                message: m.message,
            }));
        }

        matches
    }

    /// Convert pattern matches to violations
    pub fn matches_to_violations(&self, matches: Vec<PatternMatch>) -> Vec<Violation> {
        matches
            .into_iter()
            .map(|m| Violation::new(m.rule_id, m.file_path, m.line_number, m.message))
            .collect()
    }

    /// Run every rule on in-memory text and return the violations
    pub fn check_text(&self, path: impl AsRef<Path>, text: &str) -> Vec<Violation> {
        let file = SourceFile::from_text(path.as_ref(), text);
        self.matches_to_violations(self.analyze_file(&file))
    }
}

fn boxed<R: StyleRule + 'static>(rule: StyleResult<R>) -> StyleResult<Box<dyn StyleRule>> {
    Ok(Box::new(rule?))
}

/// Compile a rule pattern, reporting failures as pattern errors
pub(crate) fn compile(pattern: &str) -> StyleResult<Regex> {
    Regex::new(pattern).map_err(|e| StyleError::pattern(format!("Invalid regex '{pattern}': {e}")))
}

/// 1-based line number for a 0-based index
pub(crate) fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    const CLEAN: &str = "/*\n * GNU General Public License\n */\n\n#include <stdio.h>\n\nint Add(int a, int b)\n{\n\treturn a + b;\n}\n";

    #[test]
    fn test_catalog_order_and_ids_unique() {
        let ids: Vec<_> = RULE_CATALOG.iter().map(|info| info.id).collect();
        assert_eq!(ids.len(), 15);
        assert_eq!(ids.first(), Some(&"license_header"));
        assert_eq!(ids.last(), Some(&"definition_spacing"));

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn test_default_config_enables_everything() {
        let engine = PatternEngine::from_config(&RuleConfig::default()).unwrap();
        assert_eq!(engine.rule_ids().len(), RULE_CATALOG.len());
    }

    #[test]
    fn test_disabled_rules_not_registered() {
        let config = ConfigBuilder::new()
            .rules(|r| {
                r.max_line_length = 0;
                r.require_license_header = false;
                r.typedef_struct_suffix.clear();
            })
            .build()
            .unwrap();
        let engine = PatternEngine::from_config(&config.rules).unwrap();
        let ids = engine.rule_ids();

        assert!(!ids.contains(&"max_line_length"));
        assert!(!ids.contains(&"license_header"));
        assert!(!ids.contains(&"typedef_struct_suffix"));
        assert!(ids.contains(&"trailing_whitespace"));
    }

    #[test]
    fn test_clean_file_has_no_violations() {
        let engine = PatternEngine::from_config(&RuleConfig::default()).unwrap();
        let violations = engine.check_text("src/add.c", CLEAN);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_violations_follow_rule_order() {
        let engine = PatternEngine::from_config(&RuleConfig::default()).unwrap();
        let source = "int x;\nint y=1; \nwhile(y);";
        let violations = engine.check_text("src/bad.c", source);
        let ids: Vec<_> = violations.iter().map(|v| v.rule_id.as_str()).collect();

        assert_eq!(
            ids,
            vec![
                "license_header",
                "newline_at_eof",
                "trailing_whitespace",
                "operator_spacing",
                "keyword_spacing_after",
            ]
        );
        assert_eq!(violations[0].line_number, 1);
        assert_eq!(violations[1].line_number, 3);
        assert_eq!(violations[2].format_display(), "src/bad.c:2: trailing whitespace");
    }

    #[test]
    fn test_comment_only_content_is_inert() {
        let engine = PatternEngine::from_config(&RuleConfig::default()).unwrap();
        let source = format!("{CLEAN}\n/*\nif(x==1){{\n*/\n// for(;;){{a=b;}}\n");
        assert!(engine.check_text("src/c.c", &source).is_empty());
    }

    #[test]
    fn test_rule_info_lookup() {
        let info = rule_info("brace_spacing").unwrap();
        assert_eq!(info.config_key, "require_space_around_braces");
        assert!(rule_info("no_such_rule").is_none());
    }
}
