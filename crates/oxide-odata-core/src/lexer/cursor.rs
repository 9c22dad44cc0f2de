//! Character cursor with lookahead over the query text.

use crate::error::{LexError, LexErrorKind};

/// A forward-only position in the input.
///
/// The cursor is the only mutable lexer state; each lexer owns its own.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    /// Current byte offset.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// The full input.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Current offset counted in characters.
    #[must_use]
    pub fn char_pos(&self) -> usize {
        self.char_pos_of(self.pos)
    }

    /// Character offset of an arbitrary byte offset.
    #[must_use]
    pub fn char_pos_of(&self, byte: usize) -> usize {
        self.input
            .get(..byte)
            .map_or(byte, |prefix| prefix.chars().count())
    }

    /// True before the first character has been consumed.
    #[must_use]
    pub const fn at_start(&self) -> bool {
        self.pos == 0
    }

    /// True once every character has been consumed.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The unconsumed remainder of the input.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Input between `start` and the current position.
    #[must_use]
    pub fn since(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }

    /// Returns the current character without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the character `n` positions ahead without advancing.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consumes and returns the current character.
    pub fn move_next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `bytes` bytes; the caller guarantees a char boundary.
    pub fn skip(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.input.len());
    }

    /// Consumes the current character if it equals `c`.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `pred` holds and returns them.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.move_next();
        }
        self.since(start)
    }

    /// Skips leading whitespace.
    pub fn skip_whitespace(&mut self) {
        self.eat_while(super::chars::is_whitespace);
    }

    /// Consumes `c` or fails with an error at the current position.
    pub fn expect(&mut self, c: char) -> Result<(), LexError> {
        self.expect_any(&[c]).map(|_| ())
    }

    /// Consumes one of `choices` or fails with an error at the current position.
    pub fn expect_any(&mut self, choices: &[char]) -> Result<char, LexError> {
        match self.peek() {
            Some(c) if choices.contains(&c) => {
                self.move_next();
                Ok(c)
            }
            Some(c) => Err(self.error(LexErrorKind::UnexpectedChar(c))),
            None => Err(self.error(LexErrorKind::UnexpectedChar('\0'))),
        }
    }

    /// Builds an error located at the current position.
    #[must_use]
    pub fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.char_pos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_next_and_peek() {
        let mut cursor = Cursor::new("ab");
        assert!(cursor.at_start());
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_nth(1), Some('b'));
        assert_eq!(cursor.move_next(), Some('a'));
        assert!(!cursor.at_start());
        assert_eq!(cursor.move_next(), Some('b'));
        assert!(cursor.at_end());
        assert_eq!(cursor.move_next(), None);
    }

    #[test]
    fn test_expect() {
        let mut cursor = Cursor::new("('");
        assert!(cursor.expect('(').is_ok());
        let err = cursor.expect(')').unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('\''));
        assert_eq!(err.position, 1);
        assert_eq!(cursor.expect_any(&['"', '\'']), Ok('\''));
    }

    #[test]
    fn test_eat_while() {
        let mut cursor = Cursor::new("123abc");
        assert_eq!(cursor.eat_while(|c| c.is_ascii_digit()), "123");
        assert_eq!(cursor.rest(), "abc");
        assert_eq!(cursor.since(1), "23");
    }

    #[test]
    fn test_independent_cursors() {
        let input = "xyz";
        let mut a = Cursor::new(input);
        let b = Cursor::new(input);
        a.move_next();
        assert_eq!(a.pos(), 1);
        assert_eq!(b.pos(), 0);
    }
}
