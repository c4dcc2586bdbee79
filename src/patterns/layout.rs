//! File-level layout rules: license header, final newline and blank lines
//! around include blocks and definitions

use super::{RuleMatch, StyleRule};
use crate::analyzer::source::SourceFile;
use crate::config::RuleConfig;
use crate::domain::violations::StyleResult;
use crate::structure::{BraceDepthLocator, DefinitionLocator};

/// The file must open with a block comment carrying the license text
#[derive(Debug)]
pub struct LicenseHeader {
    required: String,
    scan_lines: usize,
}

impl LicenseHeader {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            required: rules.license_required_substring.clone(),
            scan_lines: rules.license_scan_lines.max(1),
        })
    }
}

impl StyleRule for LicenseHeader {
    fn id(&self) -> &'static str {
        "license_header"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let raw = file.raw_lines();

        let Some(first) = raw.iter().find(|line| !line.trim().is_empty()) else {
            return vec![RuleMatch::at(0, "file is empty, missing license header")];
        };

        if !first.trim_start().starts_with("/*") {
            return vec![RuleMatch::at(
                0,
                "missing license block comment at file start (/* ... */)",
            )];
        }

        let header = raw[..self.scan_lines.min(raw.len())].join("\n");
        if !header.contains(&self.required) {
            return vec![RuleMatch::at(
                0,
                format!("license header missing '{}'", self.required),
            )];
        }

        Vec::new()
    }
}

/// A non-empty file must end with a newline byte
#[derive(Debug)]
pub struct NewlineAtEof;

impl NewlineAtEof {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self)
    }
}

impl StyleRule for NewlineAtEof {
    fn id(&self) -> &'static str {
        "newline_at_eof"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        if !file.has_bytes() || file.ends_with_newline() {
            return Vec::new();
        }

        let last = file.line_count().saturating_sub(1);
        vec![RuleMatch::at(last, "missing newline at end of file")]
    }
}

/// The span from the first to the last `#include` line must be set off by
/// blank lines
#[derive(Debug)]
pub struct IncludeBlockSpacing {
    before: bool,
    after: bool,
}

impl IncludeBlockSpacing {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            before: rules.require_blank_line_before_includes,
            after: rules.require_blank_line_after_includes,
        })
    }
}

fn is_include(line: &str) -> bool {
    line.trim_start().starts_with("#include")
}

impl StyleRule for IncludeBlockSpacing {
    fn id(&self) -> &'static str {
        "include_block_spacing"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let raw = file.raw_lines();
        let mut includes = raw.iter().enumerate().filter(|(_, line)| is_include(line)).map(|(i, _)| i);

        let Some(first) = includes.next() else {
            return Vec::new();
        };
        let last = includes.last().unwrap_or(first);
        let mut found = Vec::new();

        if self.before && first > 0 {
            let previous = &raw[first - 1];
            if !previous.trim().is_empty() && !is_include(previous) {
                found.push(RuleMatch::at(first, "missing blank line before include block"));
            }
        }

        if self.after {
            if let Some(next) = raw.get(last + 1) {
                if !next.trim().is_empty() && !is_include(next) {
                    found.push(RuleMatch::at(last + 1, "missing blank line after include block"));
                }
            }
        }

        found
    }
}

/// Function and type definitions must be surrounded by blank lines
#[derive(Debug)]
pub struct DefinitionSpacing {
    locator: Box<dyn DefinitionLocator>,
}

impl DefinitionSpacing {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self::with_locator(Box::new(BraceDepthLocator::new()?)))
    }

    pub fn with_locator(locator: Box<dyn DefinitionLocator>) -> Self {
        Self { locator }
    }
}

impl StyleRule for DefinitionSpacing {
    fn id(&self) -> &'static str {
        "definition_spacing"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let mut found = Vec::new();

        for span in self.locator.locate(file.code_lines()) {
            if span.start > 0 && !file.is_blank_line(span.start - 1) {
                found.push(RuleMatch::at(span.start, "missing blank line before definition"));
            }
            if !file.is_blank_line(span.end + 1) {
                found.push(RuleMatch::at(span.end + 1, "missing blank line after definition"));
            }
        }

        found
    }
}
