//! Comment and literal elision
//!
//! Turns raw file text into one [`CodeLine`] per physical line. Comments and
//! their delimiters are dropped without leaving whitespace behind, so no
//! artificial spacing is introduced for the rules to trip on. Literal content
//! is kept verbatim in [`CodeLine::text`] and replaced by `_` in
//! [`CodeLine::masked`], which keeps columns aligned while hiding characters
//! such as `{` or `//` that only look like code.

/// Filler used for literal content in the masked view
const MASK: char = '_';

/// One physical source line with comments removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLine {
    text: String,
    masked: String,
}

impl CodeLine {
    /// Code with literal content kept verbatim
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Code with literal content replaced by `_`
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Whether any code survives on this line
    pub fn has_code(&self) -> bool {
        !self.text.trim().is_empty()
    }

    fn push_code(&mut self, ch: char) {
        self.text.push(ch);
        self.masked.push(ch);
    }

    fn push_literal(&mut self, ch: char) {
        self.text.push(ch);
        self.masked.push(MASK);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    BlockComment,
    LineComment,
    Literal { quote: char, escaped: bool },
}

/// Produce the code view of `text`.
///
/// Line splitting follows [`str::lines`]: `\n` and `\r\n` end a line and a
/// trailing terminator does not open an extra empty line. A block comment or
/// literal left open at end of input simply swallows the rest of the file.
pub fn scan(text: &str) -> Vec<CodeLine> {
    let mut lines = Vec::new();
    let mut current = CodeLine::default();
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }

        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
            state = match state {
                State::LineComment => State::Code,
                State::Literal { quote, .. } => State::Literal { quote, escaped: false },
                other => other,
            };
            continue;
        }

        state = match state {
            State::LineComment => State::LineComment,
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    State::Code
                } else {
                    State::BlockComment
                }
            }
            State::Literal { quote, escaped } => {
                if escaped {
                    current.push_literal(ch);
                    State::Literal { quote, escaped: false }
                } else if ch == '\\' {
                    current.push_literal(ch);
                    State::Literal { quote, escaped: true }
                } else if ch == quote {
                    current.push_code(ch);
                    State::Code
                } else {
                    current.push_literal(ch);
                    State::Literal { quote, escaped: false }
                }
            }
            State::Code => match (ch, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    State::LineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    State::BlockComment
                }
                ('"' | '\'', _) => {
                    current.push_code(ch);
                    State::Literal { quote: ch, escaped: false }
                }
                _ => {
                    current.push_code(ch);
                    State::Code
                }
            },
        };
    }

    if !text.is_empty() && !text.ends_with('\n') {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        scan(source).into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn test_line_count_matches_lines() {
        let samples = [
            "",
            "\n",
            "a",
            "a\n",
            "a\nb",
            "a\n\nb\n",
            "x = 1; /* open\nstill open\n",
            "s = \"unterminated\nmore\n",
            "a\r\nb\r\n",
            "// only\n/* a */\n",
        ];
        for sample in samples {
            assert_eq!(scan(sample).len(), sample.lines().count(), "sample {sample:?}");
        }
    }

    #[test]
    fn test_line_comment_removed() {
        assert_eq!(texts("int x = 1; // if(x==1) {\n"), vec!["int x = 1; "]);
        assert_eq!(texts("// whole line\n"), vec![""]);
    }

    #[test]
    fn test_block_comment_removed_without_whitespace() {
        assert_eq!(texts("a/* gap */b\n"), vec!["ab"]);
    }

    #[test]
    fn test_multiline_block_comment_keeps_alignment() {
        let code = texts("x;\n/*\n if(x==1)\n*/\ny;\n");
        assert_eq!(code, vec!["x;", "", "", "", "y;"]);
    }

    #[test]
    fn test_literals_preserved_and_masked() {
        let lines = scan("s = \"// not {a} comment\";\n");
        assert_eq!(lines[0].text(), "s = \"// not {a} comment\";");
        assert_eq!(lines[0].masked(), "s = \"__________________\";");
        assert_eq!(lines[0].text().chars().count(), lines[0].masked().chars().count());
    }

    #[test]
    fn test_escaped_quote_does_not_close_literal() {
        let lines = scan("s = \"a\\\"b\"; // c\n");
        assert_eq!(lines[0].text(), "s = \"a\\\"b\"; ");
        assert_eq!(lines[0].masked(), "s = \"____\"; ");
    }

    #[test]
    fn test_char_literal() {
        let lines = scan("c = '{'; d = '\\''; // x\n");
        assert_eq!(lines[0].text(), "c = '{'; d = '\\''; ");
        assert_eq!(lines[0].masked(), "c = '_'; d = '__'; ");
    }

    #[test]
    fn test_quote_inside_comment_is_ignored() {
        assert_eq!(texts("a; // it's \"fine\"\nb;\n"), vec!["a; ", "b;"]);
        assert_eq!(texts("/* \" */ c;\n"), vec![" c;"]);
    }

    #[test]
    fn test_unterminated_block_comment_swallows_rest() {
        assert_eq!(texts("a;\n/* never closed\nb;\nc;"), vec!["a;", "", "", ""]);
    }

    #[test]
    fn test_crlf_does_not_leak() {
        assert_eq!(texts("a;\r\nb; // c\r\n"), vec!["a;", "b; "]);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let source = "/* lic */\n#include <a.h>\n\nint f(int *p) // x\n{\n\treturn \"}\";\n}\n";
        let first: Vec<String> = texts(source);
        let rejoined = format!("{}\n", first.join("\n"));
        assert_eq!(texts(&rejoined), first);
    }
}
