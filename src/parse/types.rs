use std::ops::Range;

//===========================================================================//

/// A span of byte offsets within a bench script or hex image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SrcSpan {
    start: usize,
    end: usize,
}

impl SrcSpan {
    /// Returns the span covering the given byte range.
    pub fn from_byte_range(range: Range<usize>) -> SrcSpan {
        assert!(range.start <= range.end);
        SrcSpan { start: range.start, end: range.end }
    }

    /// Returns the byte range represented by this span.
    pub fn byte_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Merges two spans, returning the smallest span that covers both.
    pub fn merged_with(&self, other: SrcSpan) -> SrcSpan {
        SrcSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the 1-based line and 0-based column of the start of this span
    /// within `source`.
    pub fn line_column(&self, source: &str) -> (usize, usize) {
        let before = &source[..self.start.min(source.len())];
        let line = 1 + before.matches('\n').count();
        let column = match before.rfind('\n') {
            Some(newline) => self.start - newline - 1,
            None => self.start,
        };
        (line, column)
    }

    pub(crate) fn end_span(&self) -> SrcSpan {
        SrcSpan { start: self.end, end: self.end }
    }
}

//===========================================================================//

/// The result of parsing a bench script or hex image, which may fail with
/// several errors at once.
pub type ParseResult<V> = Result<V, Vec<ParseError>>;

//===========================================================================//

/// A syntax or semantic error in a bench script or hex image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    /// The text that the error is about.
    pub span: SrcSpan,
    /// A one-line description, printed after `SCRIPT:line:col:`.
    pub message: String,
    /// Notes pointing at related text, such as an earlier conflicting
    /// request.
    pub labels: Vec<ParseErrorLabel>,
}

impl ParseError {
    /// Returns an error about the given span, with no notes.
    pub fn new(span: SrcSpan, message: String) -> ParseError {
        ParseError { span, message, labels: Vec::new() }
    }

    /// Attaches a note about some other span.
    pub fn with_label(mut self, span: SrcSpan, message: String) -> ParseError {
        self.labels.push(ParseErrorLabel { span, message });
        self
    }
}

//===========================================================================//

/// A note attached to a [`ParseError`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseErrorLabel {
    /// The text the note points at.
    pub span: SrcSpan,
    /// The text of the note.
    pub message: String,
}

//===========================================================================//


//===========================================================================//
