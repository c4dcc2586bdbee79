//! Token spacing rules over the masked code view: operators, control
//! keywords and braces

use super::{compile, RuleMatch, StyleRule};
use crate::analyzer::source::SourceFile;
use crate::config::RuleConfig;
use crate::domain::violations::StyleResult;
use regex::Regex;

/// Lines starting with a preprocessor directive
const PREPROCESSOR: &str = r"^\s*#";

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters after which `+`, `-` and `*` act as unary operators
const UNARY_CONTEXT: &[char] = &[
    '(', '[', '{', ',', ';', '=', '?', ':', '!', '~', '<', '>', '&', '|', '^', '+', '-', '*', '/', '%',
];

/// Keywords after which `+`, `-` and `*` act as unary operators
const UNARY_KEYWORDS: &[&str] = &["return", "case", "sizeof", "throw", "delete", "new"];

/// Operators must be separated from their operands by spaces on both sides
#[derive(Debug)]
pub struct OperatorSpacing {
    compound: Regex,
    operator: Regex,
    preprocessor: Regex,
}

impl OperatorSpacing {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            compound: compile(r"->|\+\+|--|::|<<=|>>=|<<|>>")?,
            // longest tokens first; a run of stars is one declarator token
            operator: compile(r"==|!=|<=|>=|&&|\|\||[-+*/%&|^]=|\*+|[-+/%=<>]")?,
            preprocessor: compile(PREPROCESSOR)?,
        })
    }

    fn is_violation(&self, code: &str) -> bool {
        if self.preprocessor.is_match(code) {
            return false;
        }
        // member access, increments, scope and shifts are exempt
        let exposed = self.compound.replace_all(code, |caps: &regex::Captures<'_>| {
            " ".repeat(caps[0].len())
        });

        self.operator.find_iter(&exposed).any(|token| {
            let before = &exposed[..token.start()];
            let after = &exposed[token.end()..];
            let tight_before = before.chars().next_back().is_some_and(|c| !is_blank(c));
            let tight_after = after.chars().next().is_some_and(|c| !is_blank(c));
            if !tight_before && !tight_after {
                return false;
            }

            let op = token.as_str();
            let is_stars = op.chars().all(|c| c == '*');
            if (is_stars || op == "+" || op == "-") && is_unary_position(before) {
                return false;
            }
            // `Type *name`
            !(is_stars && !tight_before)
        })
    }
}

/// Whether an operator preceded by `before` on its line has no left operand
fn is_unary_position(before: &str) -> bool {
    let before = before.trim_end();
    match before.chars().next_back() {
        None => true,
        Some(c) if UNARY_CONTEXT.contains(&c) => true,
        Some(_) => {
            let word = before
                .rsplit(|c: char| !(c.is_alphanumeric() || c == '_'))
                .next()
                .unwrap_or_default();
            UNARY_KEYWORDS.contains(&word)
        }
    }
}

impl StyleRule for OperatorSpacing {
    fn id(&self) -> &'static str {
        "operator_spacing"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        file.code_lines()
            .iter()
            .enumerate()
            .filter(|(_, code)| self.is_violation(code.masked()))
            .map(|(index, _)| RuleMatch::at(index, "missing spaces around operator"))
            .collect()
    }
}

/// `if`, `for`, `while` and `switch` need a space before their `(`
#[derive(Debug)]
pub struct KeywordSpacingAfter {
    keyword: Regex,
    else_if: Regex,
}

impl KeywordSpacingAfter {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            keyword: compile(r"\b(?:if|switch|for|while)\(")?,
            else_if: compile(r"\belse\s+if\(")?,
        })
    }
}

impl StyleRule for KeywordSpacingAfter {
    fn id(&self) -> &'static str {
        "keyword_spacing_after"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let mut found = Vec::new();

        for (index, code) in file.code_lines().iter().enumerate() {
            let masked = code.masked();
            if self.keyword.is_match(masked) {
                found.push(RuleMatch::at(
                    index,
                    "missing space after keyword (use 'if (' / 'for (' etc.)",
                ));
            }
            if self.else_if.is_match(masked) {
                found.push(RuleMatch::at(index, "missing space in 'else if ('"));
            }
        }

        found
    }
}

/// Keywords must not be glued to a preceding `;`, `}`, `)` or `]`
#[derive(Debug)]
pub struct KeywordSpacingBefore {
    glued: Regex,
}

impl KeywordSpacingBefore {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            glued: compile(
                r"([;}\)\]])(if|for|while|switch|return|break|continue|case|else)\b",
            )?,
        })
    }
}

impl StyleRule for KeywordSpacingBefore {
    fn id(&self) -> &'static str {
        "keyword_spacing_before"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let mut found = Vec::new();

        for (index, code) in file.code_lines().iter().enumerate() {
            if let Some(caps) = self.glued.captures(code.masked()) {
                found.push(RuleMatch::at(
                    index,
                    format!("missing space before keyword '{}' (after '{}')", &caps[2], &caps[1]),
                ));
            }
        }

        found
    }
}

/// Spacing around `{` and `}`.
///
/// `{` needs a blank before it unless it opens the line's first column, and
/// a blank after it when more code follows. `}` needs a blank before it
/// unless it is the first non-blank character. After `}` the next token is
/// either glued `;`, `,` or `)`, or separated by a blank.
#[derive(Debug)]
pub struct BraceSpacing {
    forbid_space_before_terminator: bool,
}

impl BraceSpacing {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            forbid_space_before_terminator: rules.forbid_space_between_brace_and_terminator,
        })
    }

    fn check_line(&self, line: &str) -> Vec<&'static str> {
        let chars: Vec<char> = line.chars().collect();
        let first_code = chars.iter().position(|&c| !is_blank(c));
        let mut found = Vec::new();

        for (index, &ch) in chars.iter().enumerate() {
            let previous = index.checked_sub(1).map(|i| chars[i]);
            let rest = &chars[index + 1..];

            match ch {
                '{' => {
                    if previous.is_some_and(|c| !is_blank(c)) {
                        found.push("missing space before '{'");
                    }
                    let more_follows = rest.iter().any(|&c| !is_blank(c));
                    if more_follows && rest.first().is_some_and(|&c| !is_blank(c)) {
                        found.push("missing space after '{'");
                    }
                }
                '}' => {
                    if Some(index) != first_code && previous.is_some_and(|c| !is_blank(c)) {
                        found.push("missing space before '}'");
                    }

                    match rest.iter().position(|&c| !is_blank(c)) {
                        // nothing else on the line
                        None => {}
                        Some(0) => {
                            if !matches!(rest[0], ';' | ',' | ')') {
                                found.push("missing space after '}'");
                            }
                        }
                        Some(gap) => {
                            if self.forbid_space_before_terminator
                                && matches!(rest[gap], ';' | ',' | ')')
                            {
                                found.push("unexpected space after '}' before ';', ',', or ')'");
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        found
    }
}

impl StyleRule for BraceSpacing {
    fn id(&self) -> &'static str {
        "brace_spacing"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let mut found = Vec::new();

        for (index, code) in file.code_lines().iter().enumerate() {
            for message in self.check_line(code.masked()) {
                found.push(RuleMatch::at(index, message));
            }
        }

        found
    }
}
