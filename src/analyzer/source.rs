//! Per-file source views handed to the rule engine

use crate::scanner::{scan, CodeLine};
use std::path::{Path, PathBuf};

/// Raw and code views of one decoded file
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    raw_lines: Vec<String>,
    code_lines: Vec<CodeLine>,
    has_bytes: bool,
    ends_with_newline: bool,
}

impl SourceFile {
    /// Decode `bytes` as UTF-8. Returns `None` for content that is not text.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        Some(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let raw_lines: Vec<String> = text.lines().map(str::to_string).collect();
        let mut code_lines = scan(text);
        code_lines.resize_with(raw_lines.len(), CodeLine::default);

        Self {
            path: path.into(),
            raw_lines,
            code_lines,
            has_bytes: !text.is_empty(),
            ends_with_newline: text.ends_with('\n'),
        }
    }

    /// Path relative to the checked root
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    pub fn code_lines(&self) -> &[CodeLine] {
        &self.code_lines
    }

    /// Raw and code view of each line, paired by index
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str, &CodeLine)> {
        self.raw_lines
            .iter()
            .zip(&self.code_lines)
            .enumerate()
            .map(|(index, (raw, code))| (index, raw.as_str(), code))
    }

    pub fn line_count(&self) -> usize {
        self.raw_lines.len()
    }

    /// Whether the file holds at least one byte
    pub fn has_bytes(&self) -> bool {
        self.has_bytes
    }

    /// Whether the file has no line with visible content
    pub fn is_blank(&self) -> bool {
        self.raw_lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn ends_with_newline(&self) -> bool {
        self.ends_with_newline
    }

    /// Whether the raw line at `index` is blank. Out of range counts as blank.
    pub fn is_blank_line(&self, index: usize) -> bool {
        self.raw_lines.get(index).map_or(true, |line| line.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_are_aligned() {
        let file = SourceFile::from_text("a.c", "/* x\n y */\nint a;\r\n");
        assert_eq!(file.line_count(), 3);
        assert_eq!(file.code_lines().len(), 3);
        assert_eq!(file.raw_lines()[2], "int a;");
        assert_eq!(file.code_lines()[2].text(), "int a;");
        assert!(file.ends_with_newline());
    }

    #[test]
    fn test_non_text_rejected() {
        assert!(SourceFile::from_bytes("blob.c", &[0x66, 0xff, 0xfe, 0x00]).is_none());
        assert!(SourceFile::from_bytes("ok.c", b"int a;").is_some());
    }

    #[test]
    fn test_blank_and_empty() {
        let empty = SourceFile::from_text("e.h", "");
        assert!(!empty.has_bytes());
        assert!(empty.is_blank());
        assert_eq!(empty.line_count(), 0);

        let spaces = SourceFile::from_text("s.h", "  \n\t\n");
        assert!(spaces.has_bytes());
        assert!(spaces.is_blank());
        assert!(spaces.is_blank_line(7));
        assert!(!SourceFile::from_text("x.h", "x\n").is_blank_line(0));
    }
}
