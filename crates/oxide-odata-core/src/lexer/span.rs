//! Source location tracking for tokens.

/// A byte range in the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` covered by this span.
    ///
    /// Out-of-range spans yield an empty string.
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or_default()
    }

    /// Converts the start byte offset into a character offset.
    #[must_use]
    pub fn char_start(&self, source: &str) -> usize {
        source
            .get(..self.start)
            .map_or(self.start, |prefix| prefix.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
        assert_eq!(Span::new(10, 5).len(), 0);
    }

    #[test]
    fn test_span_slice() {
        let source = "name eq 'x'";
        assert_eq!(Span::new(5, 7).slice(source), "eq");
        assert_eq!(Span::new(40, 50).slice(source), "");
    }

    #[test]
    fn test_char_start_counts_multibyte() {
        let source = "'é' eq x";
        // 'é' is two bytes, so "eq" starts at byte 5 but char 4.
        assert_eq!(Span::new(5, 7).char_start(source), 4);
    }
}
