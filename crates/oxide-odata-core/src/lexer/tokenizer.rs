//! OData query tokenizer.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::chars::{is_char, is_digit, is_identifier_char, is_identifier_start_char};
use super::{
    Cursor, IdentifierToken, LiteralToken, LiteralType, Span, SyntaxToken, Token, TokenKind,
};
use crate::ast::{DateTimeValue, IsoDuration, Operator};
use crate::error::{LexError, LexErrorKind};

/// An unquoted ISO 8601 date or date-time at the start of a number.
static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:\d{2})?)?")
        .expect("date pattern is valid")
});

/// The quoted-literal prefixes (`guid'...'`, `X'...'`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypedPrefix {
    Guid,
    Binary,
    /// `X'...'`: hex digits only.
    Hex,
    /// `date'...'`: a calendar date.
    Date,
    /// `datetime'...'`: a date and time, with or without offset.
    DateTime,
    /// `datetimeoffset'...'`: a date and time with offset.
    DateTimeOffset,
    /// `time'...'`: an ISO duration or a time of day.
    Time,
    Duration,
}

impl TypedPrefix {
    fn from_identifier(ident: &str) -> Option<Self> {
        match ident.to_ascii_lowercase().as_str() {
            "guid" => Some(Self::Guid),
            "binary" => Some(Self::Binary),
            "x" => Some(Self::Hex),
            "date" => Some(Self::Date),
            "datetime" => Some(Self::DateTime),
            "datetimeoffset" => Some(Self::DateTimeOffset),
            "time" => Some(Self::Time),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }

    const fn literal_type(self) -> LiteralType {
        match self {
            Self::Guid => LiteralType::Guid,
            Self::Binary | Self::Hex => LiteralType::Binary,
            Self::Date | Self::DateTime | Self::DateTimeOffset | Self::Time => {
                LiteralType::DateTime
            }
            Self::Duration => LiteralType::Duration,
        }
    }

    /// Whether a temporal body has the form this prefix promises.
    const fn admits(self, value: Option<&DateTimeValue>) -> bool {
        matches!(
            (self, value),
            (Self::Date, Some(DateTimeValue::Date(_)))
                | (Self::Time, Some(DateTimeValue::Time(_)))
                | (
                    Self::DateTime,
                    Some(DateTimeValue::Local(_) | DateTimeValue::Offset(_))
                )
                | (Self::DateTimeOffset, Some(DateTimeValue::Offset(_)))
        )
    }

    const fn expected_form(self) -> &'static str {
        match self {
            Self::Date => "expected a date",
            Self::Time => "expected a time of day or duration",
            Self::DateTimeOffset => "expected a date and time with offset",
            _ => "expected a date and time",
        }
    }
}

/// A lexer that tokenizes OData query text.
///
/// Each lexer owns its cursor, so several lexers may run over the same
/// input independently.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    /// The byte position of the start of the current token.
    start: usize,
    /// Whether the last token can end an operand, which decides if a
    /// following `-` is a sign or unary minus.
    previous_ends_value: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            start: 0,
            previous_ends_value: false,
        }
    }

    /// Creates a token spanning from the token start to the cursor.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.cursor.pos()))
    }

    /// Character offset of the current token start.
    fn start_position(&self) -> usize {
        self.cursor.char_pos_of(self.start)
    }

    /// Builds a literal token after checking that its body is well formed.
    fn make_literal(&self, text: impl Into<String>, literal_type: LiteralType) -> Result<Token, LexError> {
        let literal = LiteralToken::new(text, literal_type);
        literal
            .value()
            .map_err(|kind| LexError::new(kind, self.start_position()))?;
        Ok(self.make_token(TokenKind::Literal(literal)))
    }

    /// Rejects an identifier character glued to the end of a literal.
    fn expect_boundary(&self) -> Result<(), LexError> {
        match self.cursor.peek() {
            Some(c) if is_identifier_char(c) => Err(self.cursor.error(LexErrorKind::UnexpectedChar(c))),
            _ => Ok(()),
        }
    }

    /// Scans the body of a quoted literal, unescaping doubled quotes.
    fn scan_quoted(&mut self, literal_type: LiteralType) -> Result<String, LexError> {
        self.cursor.expect('\'')?;
        let mut value = String::new();
        loop {
            match self.cursor.move_next() {
                Some('\'') => {
                    if !self.cursor.eat('\'') {
                        return Ok(value);
                    }
                    value.push('\'');
                }
                Some(c) if is_char(c) => value.push(c),
                Some(c) => {
                    return Err(LexError::new(
                        LexErrorKind::UnexpectedChar(c),
                        self.cursor.char_pos().saturating_sub(1),
                    ));
                }
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedLiteral(literal_type),
                        self.start_position(),
                    ));
                }
            }
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> Result<Token, LexError> {
        let value = self.scan_quoted(LiteralType::String)?;
        Ok(self.make_token(TokenKind::Literal(LiteralToken::new(
            value,
            LiteralType::String,
        ))))
    }

    /// Scans the quoted body after a typed-literal prefix.
    fn scan_typed_literal(&mut self, prefix: TypedPrefix) -> Result<Token, LexError> {
        let body = self.scan_quoted(prefix.literal_type())?;
        let literal_type = match prefix {
            TypedPrefix::Hex if hex::decode(&body).is_err() => {
                return Err(LexError::malformed(
                    LiteralType::Binary,
                    body,
                    "expected an even number of hex digits",
                    self.start_position(),
                ));
            }
            TypedPrefix::Time if IsoDuration::from_str(&body).is_ok() => LiteralType::Duration,
            TypedPrefix::Date
            | TypedPrefix::DateTime
            | TypedPrefix::DateTimeOffset
            | TypedPrefix::Time
                if !prefix.admits(DateTimeValue::parse(&body).as_ref()) =>
            {
                return Err(LexError::malformed(
                    LiteralType::DateTime,
                    body,
                    prefix.expected_form(),
                    self.start_position(),
                ));
            }
            _ => prefix.literal_type(),
        };
        self.make_literal(body, literal_type)
    }

    /// Scans an identifier, member path, keyword constant or typed literal.
    fn scan_identifier(&mut self) -> Result<Token, LexError> {
        loop {
            self.cursor.eat_while(is_identifier_char);
            match (self.cursor.peek(), self.cursor.peek_nth(1)) {
                (Some('/' | '.'), Some(next)) if is_identifier_start_char(next) => {
                    self.cursor.move_next();
                }
                _ => break,
            }
        }

        let ident = self.cursor.since(self.start);
        if self.cursor.peek() == Some('\'') {
            if let Some(prefix) = TypedPrefix::from_identifier(ident) {
                return self.scan_typed_literal(prefix);
            }
        }

        let kind = match ident {
            "true" => TokenKind::Literal(LiteralToken::TRUE),
            "false" => TokenKind::Literal(LiteralToken::FALSE),
            "null" => TokenKind::Literal(LiteralToken::NULL),
            "NaN" => TokenKind::Literal(LiteralToken::NAN),
            "INF" => TokenKind::Literal(LiteralToken::POSITIVE_INFINITY),
            _ => TokenKind::Identifier(IdentifierToken::new(ident)),
        };
        Ok(self.make_token(kind))
    }

    /// Scans a number or bare ISO date. Any sign has already been consumed.
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let body_start = self.cursor.pos();
        let negative = self.cursor.since(self.start).starts_with('-');

        if body_start == self.start {
            if let Some(date) = ISO_DATE.find(self.cursor.rest()) {
                let text = date.as_str();
                self.cursor.skip(text.len());
                self.expect_boundary()?;
                return self.make_literal(text, LiteralType::DateTime);
            }
        }

        self.cursor.eat_while(is_digit);
        let mut fractional = false;
        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(is_digit) {
            self.cursor.move_next();
            self.cursor.eat_while(is_digit);
            fractional = true;
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let signed = usize::from(matches!(self.cursor.peek_nth(1), Some('+' | '-')));
            if self.cursor.peek_nth(1 + signed).is_some_and(is_digit) {
                self.cursor.skip(1 + signed);
                self.cursor.eat_while(is_digit);
                fractional = true;
            }
        }

        let digits = self.cursor.since(body_start);
        let text = if negative {
            format!("-{digits}")
        } else {
            digits.to_owned()
        };

        let literal_type = match self.cursor.peek() {
            Some('L') if !fractional => Some(LiteralType::Long),
            Some('M' | 'm') => Some(LiteralType::Decimal),
            Some('D' | 'd') => Some(LiteralType::Double),
            Some('F' | 'f') => Some(LiteralType::Single),
            _ => None,
        };
        let literal_type = match literal_type {
            Some(suffixed) => {
                self.cursor.move_next();
                suffixed
            }
            None if fractional => LiteralType::Double,
            None => integer_type(&text).ok_or_else(|| {
                LexError::malformed(
                    LiteralType::Decimal,
                    text.clone(),
                    "integer out of range",
                    self.start_position(),
                )
            })?,
        };
        self.expect_boundary()?;
        self.make_literal(text, literal_type)
    }

    /// Scans a `-`: a sign folded into the following number, or unary minus.
    fn scan_minus(&mut self) -> Result<Token, LexError> {
        self.cursor.move_next();
        if !self.previous_ends_value {
            if self.cursor.peek().is_some_and(is_digit) {
                return self.scan_number();
            }
            if self.cursor.rest().starts_with("INF")
                && !self.cursor.peek_nth(3).is_some_and(is_identifier_char)
            {
                self.cursor.skip(3);
                return Ok(self.make_token(TokenKind::Literal(LiteralToken::NEGATIVE_INFINITY)));
            }
        }
        Ok(self.make_token(TokenKind::Syntax(SyntaxToken::NEGATIVE)))
    }

    /// Scans the next token, or returns `None` at the end of input.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for an unexpected character, an unterminated
    /// quote or a malformed literal body.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.cursor.skip_whitespace();
        self.start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Ok(None);
        };

        let token = match c {
            '\'' => self.scan_string()?,
            '-' => self.scan_minus()?,
            '+' if self.cursor.peek_nth(1).is_some_and(is_digit) => {
                self.cursor.move_next();
                self.scan_number()?
            }
            c if is_digit(c) => self.scan_number()?,
            c if is_identifier_start_char(c) => self.scan_identifier()?,
            c => match SyntaxToken::from_char(c) {
                Some(syntax) => {
                    self.cursor.move_next();
                    self.make_token(TokenKind::Syntax(syntax))
                }
                None => return Err(self.cursor.error(LexErrorKind::UnexpectedChar(c))),
            },
        };

        self.previous_ends_value = ends_value(&token.kind);
        Ok(Some(token))
    }

    /// Tokenizes the entire input.
    ///
    /// Empty or whitespace-only input yields no tokens.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered; no partial token list is
    /// produced.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// The narrowest type holding an unsuffixed integer.
fn integer_type(text: &str) -> Option<LiteralType> {
    if text.parse::<i32>().is_ok() {
        Some(LiteralType::Int)
    } else if text.parse::<i64>().is_ok() {
        Some(LiteralType::Long)
    } else if Decimal::from_str(text).is_ok() {
        Some(LiteralType::Decimal)
    } else {
        None
    }
}

/// True if a token can close an operand.
fn ends_value(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Literal(_) => true,
        TokenKind::Syntax(syntax) => syntax.is_paren_close(),
        TokenKind::Identifier(ident) => {
            let ident = ident.identifier();
            Operator::from_keyword(ident).is_none() && !matches!(ident, "asc" | "desc" | "as")
        }
    }
}
