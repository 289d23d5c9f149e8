//! Byte ranges into source text.
//! 源码中的字节范围。

use std::fmt;
use std::ops::Range;

/// A half-open byte range `start..end` in a loaded source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Span {
            start: start as u32,
            end: end as u32,
        }
    }

    /// A span starting at `start` and covering `len` bytes.
    pub fn at(start: usize, len: usize) -> Self {
        Span::new(start, start + len)
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Resolve the start of this span to a 1-based line and column.
    /// 将起始位置解析为从 1 开始的行号和列号。
    pub fn line_col(&self, source: &str) -> LineCol {
        let offset = (self.start as usize).min(source.len());
        let mut line = 1;
        let mut line_start = 0;
        for (i, c) in source[..offset].char_indices() {
            if c == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }
        let column = source[line_start..offset].chars().count() + 1;
        LineCol { line, column }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A human-facing source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
