//! Raw-line whitespace rules: trailing blanks, line length and indentation

use super::{RuleMatch, StyleRule};
use crate::analyzer::source::SourceFile;
use crate::config::RuleConfig;
use crate::domain::violations::StyleResult;

/// Lines must not end with spaces or tabs
#[derive(Debug)]
pub struct TrailingWhitespace;

impl TrailingWhitespace {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self)
    }
}

impl StyleRule for TrailingWhitespace {
    fn id(&self) -> &'static str {
        "trailing_whitespace"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        file.raw_lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| line.ends_with([' ', '\t']))
            .map(|(index, _)| RuleMatch::at(index, "trailing whitespace"))
            .collect()
    }
}

/// Lines must not be longer than the configured number of characters
#[derive(Debug)]
pub struct MaxLineLength {
    max: usize,
}

impl MaxLineLength {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self { max: rules.max_line_length })
    }
}

impl StyleRule for MaxLineLength {
    fn id(&self) -> &'static str {
        "max_line_length"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        if self.max == 0 {
            return Vec::new();
        }

        let mut found = Vec::new();
        for (index, line) in file.raw_lines().iter().enumerate() {
            let length = line.chars().count();
            if length > self.max {
                found.push(RuleMatch::at(
                    index,
                    format!("line exceeds {} chars (got {length})", self.max),
                ));
            }
        }
        found
    }
}

/// Leading whitespace of lines that carry code. Lines that are blank or
/// hold only comment text have no indentation to check.
fn code_indentation(file: &SourceFile) -> impl Iterator<Item = (usize, &str)> {
    file.lines().filter(|(_, _, code)| code.has_code()).filter_map(|(index, raw, _)| {
        let body = raw.trim_start_matches([' ', '\t']);
        let prefix = &raw[..raw.len() - body.len()];
        (!prefix.is_empty()).then_some((index, prefix))
    })
}

/// Indentation must use tabs only
#[derive(Debug)]
pub struct IndentationCharacter;

impl IndentationCharacter {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self)
    }
}

impl StyleRule for IndentationCharacter {
    fn id(&self) -> &'static str {
        "indentation_character"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        code_indentation(file)
            .filter(|(_, prefix)| prefix.contains(' '))
            .map(|(index, _)| RuleMatch::at(index, "spaces used for indentation (tabs only)"))
            .collect()
    }
}

/// Indentation width, with tabs counted as `tab_width` columns, must be a
/// multiple of the configured unit
#[derive(Debug)]
pub struct IndentationMultiple {
    tab_width: usize,
    multiple: usize,
}

impl IndentationMultiple {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self { tab_width: rules.tab_width, multiple: rules.indent_multiple_of })
    }

    fn columns(&self, prefix: &str) -> usize {
        prefix.chars().map(|c| if c == '\t' { self.tab_width } else { 1 }).sum()
    }
}

impl StyleRule for IndentationMultiple {
    fn id(&self) -> &'static str {
        "indentation_multiple"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        if self.multiple == 0 {
            return Vec::new();
        }

        let mut found = Vec::new();
        for (index, prefix) in code_indentation(file) {
            let columns = self.columns(prefix);
            if columns % self.multiple != 0 {
                found.push(RuleMatch::at(
                    index,
                    format!("indentation {columns} columns not multiple of {}", self.multiple),
                ));
            }
        }
        found
    }
}
