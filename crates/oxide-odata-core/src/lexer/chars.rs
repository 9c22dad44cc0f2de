//! Character classification used by the tokenizer.

/// Whitespace separating tokens.
#[must_use]
#[inline]
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// ASCII decimal digit.
#[must_use]
#[inline]
pub const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// A character that may begin an identifier.
#[must_use]
#[inline]
pub fn is_identifier_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// A character that may continue an identifier.
#[must_use]
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// A printable character allowed inside quoted literals.
#[must_use]
#[inline]
pub fn is_char(c: char) -> bool {
    !c.is_control() || c == '\t'
}
