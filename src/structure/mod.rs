//! Definition boundary detection
//!
//! Architecture: Strategy Pattern - Boundary detection sits behind the DefinitionLocator trait
//! - Rules ask for definition spans and never look at how they were found
//! - BraceDepthLocator is a heuristic, not a grammar: it pairs braces by counting
//! - A single forward pass; a consumed span is never rescanned for nested definitions

use crate::domain::violations::{StyleError, StyleResult};
use crate::scanner::CodeLine;
use regex::Regex;

/// Qualifiers accepted between a parameter list and the opening brace
const TRAILING_QUALIFIERS: &str = r"(?:(?:const|noexcept|override|final)\b\s*)*";

/// What kind of construct a span covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Function,
    Type,
}

/// Line range of one brace-delimited definition.
///
/// Indices are 0-based and the end is inclusive: `end` is the line on which
/// the brace depth returns to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionSpan {
    pub kind: DefinitionKind,
    pub start: usize,
    pub end: usize,
}

/// Finds definition spans in a code view
pub trait DefinitionLocator: Send + Sync + std::fmt::Debug {
    fn locate(&self, lines: &[CodeLine]) -> Vec<DefinitionSpan>;
}

/// Locates definitions by signature shape and brace counting
#[derive(Debug)]
pub struct BraceDepthLocator {
    signature_with_brace: Regex,
    signature_end: Regex,
    type_keyword: Regex,
    preprocessor: Regex,
}

impl BraceDepthLocator {
    pub fn new() -> StyleResult<Self> {
        Ok(Self {
            signature_with_brace: compile(&format!(r"\)\s*{TRAILING_QUALIFIERS}\{{"))?,
            signature_end: compile(&format!(r"\)\s*{TRAILING_QUALIFIERS}$"))?,
            type_keyword: compile(r"^\s*(?:class|struct)\b")?,
            preprocessor: compile(r"^\s*#")?,
        })
    }

    /// Classify the line at `index` as the start of a definition, if it is one.
    /// Type definitions are tried before functions.
    pub fn definition_start(&self, lines: &[CodeLine], index: usize) -> Option<DefinitionKind> {
        if self.is_type_start(lines, index) {
            Some(DefinitionKind::Type)
        } else if self.is_function_start(lines, index) {
            Some(DefinitionKind::Function)
        } else {
            None
        }
    }

    fn is_function_start(&self, lines: &[CodeLine], index: usize) -> bool {
        let line = lines[index].masked();
        let trimmed = line.trim();

        if trimmed.is_empty() || self.preprocessor.is_match(line) {
            return false;
        }
        if !line.contains(')') || trimmed.ends_with(';') {
            return false;
        }
        if self.signature_with_brace.is_match(line) {
            return true;
        }

        next_line_is_open_brace(lines, index) && self.signature_end.is_match(line)
    }

    fn is_type_start(&self, lines: &[CodeLine], index: usize) -> bool {
        let line = lines[index].masked();
        let trimmed = line.trim();

        if trimmed.is_empty() || !self.type_keyword.is_match(line) {
            return false;
        }
        // forward declaration
        if trimmed.ends_with(';') && !trimmed.contains('{') {
            return false;
        }

        trimmed.contains('{') || next_line_is_open_brace(lines, index)
    }
}

impl DefinitionLocator for BraceDepthLocator {
    fn locate(&self, lines: &[CodeLine]) -> Vec<DefinitionSpan> {
        let mut spans = Vec::new();
        let mut index = 0;

        while index < lines.len() {
            let Some(kind) = self.definition_start(lines, index) else {
                index += 1;
                continue;
            };

            match find_matching_brace_end(lines, index) {
                Some(end) => {
                    spans.push(DefinitionSpan { kind, start: index, end });
                    index = end + 1;
                }
                None => {
                    tracing::debug!("No closing brace for definition starting on line {}", index + 1);
                    index += 1;
                }
            }
        }

        spans
    }
}

/// First line, from `start` on, where the running brace depth drops back to
/// zero after having been positive. Counts every brace in the line text,
/// literals included.
pub fn find_matching_brace_end(lines: &[CodeLine], start: usize) -> Option<usize> {
    let mut depth: i64 = 0;
    let mut started = false;

    for (index, line) in lines.iter().enumerate().skip(start) {
        let opens = line.text().matches('{').count() as i64;
        let closes = line.text().matches('}').count() as i64;

        if opens > 0 {
            depth += opens;
            started = true;
        }
        depth -= closes;

        if started && depth <= 0 {
            return Some(index);
        }
    }

    None
}

fn next_line_is_open_brace(lines: &[CodeLine], index: usize) -> bool {
    lines
        .iter()
        .skip(index + 1)
        .find(|line| line.has_code())
        .is_some_and(|line| line.masked().trim() == "{")
}

fn compile(pattern: &str) -> StyleResult<Regex> {
    Regex::new(pattern).map_err(|e| StyleError::pattern(format!("Invalid regex '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn spans(source: &str) -> Vec<(DefinitionKind, usize, usize)> {
        let locator = BraceDepthLocator::new().unwrap();
        locator
            .locate(&scan(source))
            .into_iter()
            .map(|s| (s.kind, s.start, s.end))
            .collect()
    }

    #[test]
    fn test_function_with_brace_on_next_line() {
        assert_eq!(spans("void Foo()\n{\n}\n"), vec![(DefinitionKind::Function, 0, 2)]);
    }

    #[test]
    fn test_function_with_brace_on_same_line_and_qualifiers() {
        let source = "int Widget::size() const noexcept {\n\treturn n;\n}\n";
        assert_eq!(spans(source), vec![(DefinitionKind::Function, 0, 2)]);

        let source = "void run() override\n{\n}\n";
        assert_eq!(spans(source), vec![(DefinitionKind::Function, 0, 2)]);
    }

    #[test]
    fn test_prototype_and_forward_declaration_ignored() {
        assert!(spans("void Foo();\nclass Bar;\nstruct Baz;\n").is_empty());
    }

    #[test]
    fn test_type_definition_consumes_nested_methods() {
        let source = "class Foo\n{\npublic:\n\tvoid a() {\n\t}\n};\n\nvoid b()\n{\n}\n";
        assert_eq!(
            spans(source),
            vec![(DefinitionKind::Type, 0, 5), (DefinitionKind::Function, 7, 9)]
        );
    }

    #[test]
    fn test_single_line_type() {
        assert_eq!(spans("struct Empty {};\n"), vec![(DefinitionKind::Type, 0, 0)]);
    }

    #[test]
    fn test_unterminated_definition_skipped() {
        assert!(spans("void Foo()\n{\n\tint x;\n").is_empty());
    }

    #[test]
    fn test_unterminated_definition_leaves_later_ones_intact() {
        let source = "void A()\n{\nint y;\nvoid B()\n{\n}\nint x;\n";
        assert_eq!(spans(source), vec![(DefinitionKind::Function, 3, 5)]);
    }

    #[test]
    fn test_brace_in_comment_not_counted() {
        let source = "void Foo()\n{\n\t// }\n\tx = 1;\n}\n";
        assert_eq!(spans(source), vec![(DefinitionKind::Function, 0, 4)]);
    }

    #[test]
    fn test_preprocessor_line_is_not_a_definition() {
        assert!(spans("#define CALL(x) {\n}\n").is_empty());
    }

    #[test]
    fn test_find_matching_brace_end() {
        let lines = scan("void f() {\n\tif (x) {\n\t}\n}\n");
        assert_eq!(find_matching_brace_end(&lines, 0), Some(3));
        assert_eq!(find_matching_brace_end(&lines, 1), Some(2));
        assert_eq!(find_matching_brace_end(&scan("void f() {\n"), 0), None);
    }
}
