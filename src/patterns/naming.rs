//! Declaration style rules: pointer/reference declarators and type names

use super::{compile, RuleMatch, StyleRule};
use crate::analyzer::source::SourceFile;
use crate::config::RuleConfig;
use crate::domain::violations::StyleResult;
use regex::Regex;

/// Words that start an expression rather than a declaration
const EXPRESSION_KEYWORDS: &[&str] =
    &["return", "case", "sizeof", "delete", "throw", "new", "else", "do"];

/// Characters after which `a*b` is arithmetic, not a declarator
const EXPRESSION_OPERATORS: &[char] = &['=', '+', '-', '/', '%', '!', '?', '|', '^', '~'];

/// Pointer and reference declarators must be written `Type *name`
#[derive(Debug)]
pub struct PointerReferenceStyle {
    rejected: [Regex; 3],
    accepted: Regex,
    preprocessor: Regex,
}

impl PointerReferenceStyle {
    pub fn from_config(_rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            rejected: [
                // Type* name
                compile(r"\b\w+[\*&]\s+\w+")?,
                // Type*name
                compile(r"\b\w+[\*&]\w+\b")?,
                // Type * name
                compile(r"\b\w+\s+[\*&]\s+\w+\b")?,
            ],
            accepted: compile(r"\b\w+\s+[\*&]\w+\b")?,
            preprocessor: compile(r"^\s*#")?,
        })
    }

    fn is_violation(&self, code: &str) -> bool {
        if self.preprocessor.is_match(code) || self.accepted.is_match(code) {
            return false;
        }

        self.rejected
            .iter()
            .flat_map(|regex| regex.find_iter(code))
            .any(|candidate| looks_like_declarator(&code[..candidate.start()], candidate.as_str()))
    }
}

/// Whether `candidate`, preceded on its line by `before`, reads as a
/// declaration rather than an arithmetic or bitwise expression
fn looks_like_declarator(before: &str, candidate: &str) -> bool {
    let word: String = candidate.chars().take_while(|c| c.is_alphanumeric() || *c == '_').collect();
    if word.starts_with(|c: char| c.is_ascii_digit()) || EXPRESSION_KEYWORDS.contains(&word.as_str()) {
        return false;
    }

    let before = before.trim_end();
    if before.ends_with(EXPRESSION_OPERATORS) {
        return false;
    }

    let previous_word = before
        .rsplit(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default();
    !EXPRESSION_KEYWORDS.contains(&previous_word)
}

impl StyleRule for PointerReferenceStyle {
    fn id(&self) -> &'static str {
        "pointer_reference_style"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        file.code_lines()
            .iter()
            .enumerate()
            .filter(|(_, code)| self.is_violation(code.masked()))
            .map(|(index, _)| {
                RuleMatch::at(index, "pointer/reference style: use 'int *var' / 'int &var'")
            })
            .collect()
    }
}

/// Names declared with `typedef struct` must carry the configured suffix
#[derive(Debug)]
pub struct TypedefStructSuffix {
    suffix: String,
    typedef_struct: Regex,
}

impl TypedefStructSuffix {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        Ok(Self {
            suffix: rules.typedef_struct_suffix.clone(),
            typedef_struct: compile(r"typedef\s+struct\s+([a-zA-Z0-9_]*)")?,
        })
    }
}

impl StyleRule for TypedefStructSuffix {
    fn id(&self) -> &'static str {
        "typedef_struct_suffix"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let mut found = Vec::new();

        for (index, code) in file.code_lines().iter().enumerate() {
            let Some(caps) = self.typedef_struct.captures(code.masked()) else {
                continue;
            };
            let name = &caps[1];
            if !name.is_empty() && !name.ends_with(&self.suffix) {
                found.push(RuleMatch::at(
                    index,
                    format!("typedef struct name must end with '{}'", self.suffix),
                ));
            }
        }

        found
    }
}

/// Names introduced by the configured keywords must start uppercase
#[derive(Debug)]
pub struct TypeNameCapitalization {
    /// `None` when no keyword is configured
    declaration: Option<Regex>,
}

impl TypeNameCapitalization {
    pub fn from_config(rules: &RuleConfig) -> StyleResult<Self> {
        let keywords: Vec<String> = rules
            .capitalized_type_keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| regex::escape(k.trim()))
            .collect();
        if keywords.is_empty() {
            return Ok(Self { declaration: None });
        }

        let declaration = compile(&format!(
            r"\b({})\s+([A-Za-z_][A-Za-z0-9_]*)",
            keywords.join("|")
        ))?;

        Ok(Self { declaration: Some(declaration) })
    }
}

impl StyleRule for TypeNameCapitalization {
    fn id(&self) -> &'static str {
        "type_name_capitalization"
    }

    fn check(&self, file: &SourceFile) -> Vec<RuleMatch> {
        let Some(declaration) = &self.declaration else {
            return Vec::new();
        };
        let mut found = Vec::new();

        for (index, code) in file.code_lines().iter().enumerate() {
            let offending = declaration
                .captures_iter(code.masked())
                .find(|caps| !caps[2].starts_with(|c: char| c.is_uppercase()));

            if let Some(caps) = offending {
                found.push(RuleMatch::at(
                    index,
                    format!("{} name must start with capital letter", &caps[1]),
                ));
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn messages(rule: &dyn StyleRule, text: &str) -> Vec<String> {
        rule.check(&SourceFile::from_text("src/t.cpp", text)).into_iter().map(|m| m.message).collect()
    }

    fn pointers() -> PointerReferenceStyle {
        PointerReferenceStyle::from_config(&RuleConfig::default()).unwrap()
    }

    #[rstest]
    #[case("int* x;", true)]
    #[case("int *x;", false)]
    #[case("int * x;", true)]
    #[case("int*x;", true)]
    #[case("const char& name = s;", true)]
    #[case("void f(Widget &w);", false)]
    #[case("x = a * b;", false)]
    #[case("y = 2*x;", false)]
    #[case("return a*b;", false)]
    #[case("total = w*h + d*e;", false)]
    #[case("ok = a && b;", false)]
    #[case("s = \"int* x\";", false)]
    #[case("// int* x;", false)]
    #[case("#define PTR(T) T* p", false)]
    fn test_pointer_reference_style(#[case] line: &str, #[case] flagged: bool) {
        let found = messages(&pointers(), &format!("{line}\n"));
        assert_eq!(!found.is_empty(), flagged, "line {line:?}");
    }

    #[test]
    fn test_pointer_style_once_per_line() {
        assert_eq!(
            messages(&pointers(), "int* a; char* b;\n"),
            vec!["pointer/reference style: use 'int *var' / 'int &var'"]
        );
    }

    fn typedefs(suffix: &str) -> TypedefStructSuffix {
        let mut rules = RuleConfig::default();
        rules.typedef_struct_suffix = suffix.to_string();
        TypedefStructSuffix::from_config(&rules).unwrap()
    }

    #[rstest]
    #[case("typedef struct node_t {", 0)]
    #[case("typedef struct node {", 1)]
    #[case("typedef struct {", 0)]
    #[case("struct node {", 0)]
    fn test_typedef_struct_suffix(#[case] line: &str, #[case] count: usize) {
        assert_eq!(messages(&typedefs("_t"), &format!("{line}\n")).len(), count);
    }

    #[test]
    fn test_typedef_struct_message_names_suffix() {
        assert_eq!(
            messages(&typedefs("_s"), "typedef struct node_t node;\n"),
            vec!["typedef struct name must end with '_s'"]
        );
    }

    fn type_names(keywords: &[&str]) -> TypeNameCapitalization {
        let mut rules = RuleConfig::default();
        rules.capitalized_type_keywords = keywords.iter().map(|k| k.to_string()).collect();
        TypeNameCapitalization::from_config(&rules).unwrap()
    }

    #[rstest]
    #[case("class Widget {", vec![])]
    #[case("class widget {", vec!["class name must start with capital letter"])]
    #[case("class _impl;", vec!["class name must start with capital letter"])]
    #[case("struct point {", vec![])]
    #[case("subclass widget", vec![])]
    fn test_class_name_capitalization(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(messages(&type_names(&["class"]), &format!("{line}\n")), expected);
    }

    #[test]
    fn test_empty_keyword_list_matches_nothing() {
        assert!(messages(&type_names(&[]), "int value;\nclass widget {\n").is_empty());
        assert!(messages(&type_names(&[""]), "int value;\n").is_empty());
    }

    #[test]
    fn test_struct_keyword_can_be_enabled() {
        let rule = type_names(&["class", "struct"]);
        assert_eq!(
            messages(&rule, "struct point {\n"),
            vec!["struct name must start with capital letter"]
        );
        assert!(messages(&rule, "struct Point {\n").is_empty());
    }
}
