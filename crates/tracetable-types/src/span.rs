use serde::{Deserialize, Serialize};
use std::fmt;

/// Column range inside a single expression.
///
/// Columns are 1-based and refer to the canonicalized expression text the
/// tokenizer saw, not to the raw program line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_col: u32,
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_col: u32, end_col: u32) -> Self {
        Self { start_col, end_col }
    }

    /// Create a zero-width span at a single column.
    pub fn point(col: u32) -> Self {
        Self::new(col, col)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(
            self.start_col.min(other.start_col),
            self.end_col.max(other.end_col),
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col {}", self.start_col)
    }
}

/// Holds program text split into addressable lines.
///
/// Line numbers are 1-based for human-readable error messages; statement
/// indices in a [`crate::ast::Program`] are 0-based and map to
/// `line_number - 1`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source: String,
    /// Cached line start byte offsets for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Split program text into lines.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1))
            .unwrap_or(self.source.len());
        let line = &self.source[start..end];
        Some(line.trim_end_matches('\r'))
    }

    /// Iterate over every line in order, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        (1..=self.line_count() as u32).filter_map(|n| self.line(n))
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let s = Span::point(5);
        assert_eq!(s.start_col, 5);
        assert_eq!(s.end_col, 5);
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(5, 10);
        let b = Span::new(3, 8);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(3, 10));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(7, 15)), "col 7");
    }

    #[test]
    fn test_source_file_line_extraction() {
        let src = SourceFile::new("SET x TO 1\nSEND x TO DISPLAY\nEND");
        assert_eq!(src.line(1), Some("SET x TO 1"));
        assert_eq!(src.line(2), Some("SEND x TO DISPLAY"));
        assert_eq!(src.line(3), Some("END"));
        assert_eq!(src.line(0), None);
        assert_eq!(src.line(4), None);
    }

    #[test]
    fn test_source_file_crlf() {
        let src = SourceFile::new("SET x TO 1\r\nEND IF\r\n");
        assert_eq!(src.line(1), Some("SET x TO 1"));
        assert_eq!(src.line(2), Some("END IF"));
        assert_eq!(src.line_count(), 3);
    }

    #[test]
    fn test_source_file_lines_keeps_blank_lines() {
        let src = SourceFile::new("a\n\nb");
        let lines: Vec<&str> = src.lines().collect();
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_source_file_empty() {
        let src = SourceFile::new("");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line(1), Some(""));
    }
}
