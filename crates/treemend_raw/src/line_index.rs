//! Line/column to absolute offset conversion.

use treemend_ast::{Location, Position, Span};

/// Precomputed line-start offsets for one document.
///
/// Built in O(lines); converts any (line, column) position to an
/// absolute byte offset in O(1). Offsets are clamped to the document
/// length, since external parsers are known to over-report the final
/// column.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset at which each line starts (line i is 0-indexed here).
    starts: Vec<u32>,
    /// Total document length in bytes.
    len: u32,
}

impl LineIndex {
    /// Builds the index for a document.
    pub fn new(document: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in document.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        Self {
            starts,
            len: document.len() as u32,
        }
    }

    /// Converts a 1-based line / 0-based byte column to an absolute
    /// offset, clamped to the document length.
    pub fn offset(&self, pos: Position) -> u32 {
        let line = pos.line.max(1) as usize - 1;
        let start = self.starts.get(line).copied().unwrap_or(self.len);
        start.saturating_add(pos.column).min(self.len)
    }

    /// Converts a reported location to a byte span.
    pub fn span(&self, loc: &Location) -> Span {
        Span::new(self.offset(loc.start), self.offset(loc.end))
    }

    /// Number of lines in the document (a trailing newline opens a final
    /// empty line).
    pub fn line_count(&self) -> u32 {
        self.starts.len() as u32
    }

    /// Document length in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// True for the empty document.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Recomputes the end-of-document position from the document text.
///
/// External parsers sometimes undercount trailing whitespace in the
/// reported end position of the root node. The true end is
/// `(line count, bytes since the last newline)`; the converter replaces
/// the root's reported end with this before building the tree.
pub fn document_end(document: &str) -> Position {
    let line = document.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
    let column = match document.rfind('\n') {
        Some(idx) => (document.len() - idx - 1) as u32,
        None => document.len() as u32,
    };
    Position::new(line, column)
}
