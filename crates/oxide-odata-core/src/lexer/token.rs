//! Token types for the OData lexer.

use std::borrow::Cow;
use std::fmt;

use super::Span;

/// The broad class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A literal value.
    Literal,
    /// A name, member path or keyword.
    Identifier,
    /// A punctuation character.
    Syntax,
}

/// The semantic type of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralType {
    Null,
    String,
    Boolean,
    Single,
    Double,
    Decimal,
    Int,
    Long,
    Binary,
    DateTime,
    Guid,
    Duration,
}

impl LiteralType {
    /// Returns the type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Binary => "Binary",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::Duration => "Duration",
        }
    }

    /// True for the numeric literal types.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Single | Self::Double | Self::Decimal | Self::Int | Self::Long
        )
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal: raw body text plus its declared type.
///
/// For strings the text is already unescaped; for typed literals
/// (`guid'...'`, `duration'...'`) it is the quoted body; for numbers it is
/// the digits without the type suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralToken {
    text: Cow<'static, str>,
    literal_type: LiteralType,
}

impl LiteralToken {
    pub const TRUE: Self = Self::constant("true", LiteralType::Boolean);
    pub const FALSE: Self = Self::constant("false", LiteralType::Boolean);
    pub const NULL: Self = Self::constant("null", LiteralType::Null);
    pub const NAN: Self = Self::constant("NaN", LiteralType::Double);
    pub const POSITIVE_INFINITY: Self = Self::constant("INF", LiteralType::Double);
    pub const NEGATIVE_INFINITY: Self = Self::constant("-INF", LiteralType::Double);

    const fn constant(text: &'static str, literal_type: LiteralType) -> Self {
        Self {
            text: Cow::Borrowed(text),
            literal_type,
        }
    }

    /// Creates a literal token.
    #[must_use]
    pub fn new(text: impl Into<String>, literal_type: LiteralType) -> Self {
        Self {
            text: Cow::Owned(text.into()),
            literal_type,
        }
    }

    /// The raw body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The declared literal type.
    #[must_use]
    pub const fn literal_type(&self) -> LiteralType {
        self.literal_type
    }

    /// True for a numeric literal carrying a folded minus sign.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.literal_type.is_numeric() && self.text.starts_with('-')
    }
}

impl fmt::Display for LiteralToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.text();
        match self.literal_type {
            LiteralType::String => write!(f, "'{}'", text.replace('\'', "''")),
            LiteralType::Guid => write!(f, "guid'{text}'"),
            LiteralType::Binary => write!(f, "binary'{text}'"),
            LiteralType::DateTime => write!(f, "datetime'{text}'"),
            LiteralType::Duration => write!(f, "duration'{text}'"),
            LiteralType::Long => write!(f, "{text}L"),
            LiteralType::Decimal => write!(f, "{text}m"),
            LiteralType::Single => write!(f, "{text}f"),
            LiteralType::Double
                if !text.contains(['.', 'e', 'E']) && !text.ends_with("NaN") && !text.ends_with("INF") =>
            {
                write!(f, "{text}d")
            }
            _ => f.write_str(text),
        }
    }
}

/// A member path or keyword such as `author/name`, `and` or `Math.round`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierToken {
    identifier: String,
}

impl IdentifierToken {
    /// Creates an identifier token.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// The full identifier text.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The `/`-separated navigation segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.identifier.split('/')
    }

    /// True if the identifier spans several navigation segments.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.identifier.contains('/')
    }
}

/// A punctuation token from the closed set `( ) / , -`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxToken {
    syntax: char,
}

impl SyntaxToken {
    pub const PAREN_OPEN: Self = Self { syntax: '(' };
    pub const PAREN_CLOSE: Self = Self { syntax: ')' };
    pub const SLASH: Self = Self { syntax: '/' };
    pub const COMMA: Self = Self { syntax: ',' };
    pub const NEGATIVE: Self = Self { syntax: '-' };

    /// Returns the syntax token for `c`, if `c` is one.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::PAREN_OPEN),
            ')' => Some(Self::PAREN_CLOSE),
            '/' => Some(Self::SLASH),
            ',' => Some(Self::COMMA),
            '-' => Some(Self::NEGATIVE),
            _ => None,
        }
    }

    /// The punctuation character.
    #[must_use]
    pub const fn syntax(&self) -> char {
        self.syntax
    }

    #[must_use]
    pub const fn is_paren_open(&self) -> bool {
        self.syntax == '('
    }

    #[must_use]
    pub const fn is_paren_close(&self) -> bool {
        self.syntax == ')'
    }

    #[must_use]
    pub const fn is_slash(&self) -> bool {
        self.syntax == '/'
    }

    #[must_use]
    pub const fn is_comma(&self) -> bool {
        self.syntax == ','
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.syntax == '-'
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A literal value.
    Literal(LiteralToken),
    /// A member path, method name or keyword.
    Identifier(IdentifierToken),
    /// Punctuation.
    Syntax(SyntaxToken),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => lit.fmt(f),
            Self::Identifier(ident) => f.write_str(ident.identifier()),
            Self::Syntax(syntax) => write!(f, "{}", syntax.syntax()),
        }
    }
}

/// A token with its span in the query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the query text.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the broad token class.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        match self.kind {
            TokenKind::Literal(_) => TokenType::Literal,
            TokenKind::Identifier(_) => TokenType::Identifier,
            TokenKind::Syntax(_) => TokenType::Syntax,
        }
    }

    /// Returns the identifier text if this is an identifier token.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(ident) => Some(ident.identifier()),
            _ => None,
        }
    }

    /// Returns the syntax token if this is punctuation.
    #[must_use]
    pub const fn as_syntax(&self) -> Option<SyntaxToken> {
        match self.kind {
            TokenKind::Syntax(syntax) => Some(syntax),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_paren_open(&self) -> bool {
        matches!(self.as_syntax(), Some(s) if s.is_paren_open())
    }

    #[must_use]
    pub const fn is_paren_close(&self) -> bool {
        matches!(self.as_syntax(), Some(s) if s.is_paren_close())
    }

    #[must_use]
    pub const fn is_slash(&self) -> bool {
        matches!(self.as_syntax(), Some(s) if s.is_slash())
    }

    #[must_use]
    pub const fn is_comma(&self) -> bool {
        matches!(self.as_syntax(), Some(s) if s.is_comma())
    }

    /// True for the `-` syntax token or a literal with a folded minus sign.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match &self.kind {
            TokenKind::Syntax(s) => s.is_negative(),
            TokenKind::Literal(lit) => lit.is_negative(),
            TokenKind::Identifier(_) => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}
