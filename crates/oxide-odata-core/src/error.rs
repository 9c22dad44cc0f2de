//! Error types for lexing, parsing and resolution.
//!
//! Every failure is fatal to the parse that produced it. The four kinds a
//! caller can observe are collected in [`ParseError`].

use thiserror::Error;

use crate::lexer::LiteralType;

/// The reason a [`LexError`] was raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    /// A quoted literal with no closing quote.
    #[error("unterminated {0} literal")]
    UnterminatedLiteral(LiteralType),

    /// A literal whose body does not match its declared type.
    #[error("malformed {literal_type} literal '{text}': {reason}")]
    MalformedLiteral {
        /// The declared literal type.
        literal_type: LiteralType,
        /// The offending body text.
        text: String,
        /// Why the body was rejected.
        reason: String,
    },

    /// The input exceeds the configured length limit.
    #[error("query exceeds {limit} characters")]
    InputTooLong {
        /// The configured limit.
        limit: usize,
    },
}

/// A lexical error, annotated with the character position it occurred at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Zero-based character offset into the query text.
    pub position: usize,
}

impl LexError {
    /// Creates a new lex error.
    #[must_use]
    pub const fn new(kind: LexErrorKind, position: usize) -> Self {
        Self { kind, position }
    }

    /// Creates a "malformed literal" error.
    #[must_use]
    pub fn malformed(
        literal_type: LiteralType,
        text: impl Into<String>,
        reason: impl Into<String>,
        position: usize,
    ) -> Self {
        Self::new(
            LexErrorKind::MalformedLiteral {
                literal_type,
                text: text.into(),
                reason: reason.into(),
            },
            position,
        )
    }
}

/// A structural error found while walking the token list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at token {token_index}")]
pub struct ParseSyntaxError {
    /// The error message.
    pub message: String,
    /// Index of the offending token. Equals the token count when the
    /// input ended early.
    pub token_index: usize,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found, rendered as source text.
    pub found: Option<String>,
}

impl ParseSyntaxError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(message: impl Into<String>, token_index: usize) -> Self {
        Self {
            message: message.into(),
            token_index,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(
        expected: impl Into<String>,
        found: impl Into<String>,
        token_index: usize,
    ) -> Self {
        let expected: String = expected.into();
        let found: String = found.into();
        Self {
            message: format!("unexpected token: expected {expected}, found '{found}'"),
            token_index,
            expected: Some(expected),
            found: Some(found),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_end(expected: impl Into<String>, token_index: usize) -> Self {
        let expected: String = expected.into();
        Self {
            message: format!("unexpected end of input: expected {expected}"),
            token_index,
            expected: Some(expected),
            found: None,
        }
    }
}

/// No registered strategy knows the requested method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown method '{method}' (strategies: {})", .strategies.join(", "))]
pub struct UnknownMethodError {
    /// The method name as written in the query.
    pub method: String,
    /// Names of the strategies that were consulted, in order.
    pub strategies: Vec<String>,
}

impl UnknownMethodError {
    /// Creates a new unknown-method error.
    #[must_use]
    pub fn new(method: impl Into<String>, strategies: Vec<String>) -> Self {
        Self {
            method: method.into(),
            strategies,
        }
    }
}

/// A member or method was rejected by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot resolve '{target}': {message}")]
pub struct ResolutionError {
    /// The member path or method name being resolved.
    pub target: String,
    /// Resolver-supplied explanation.
    pub message: String,
}

impl ResolutionError {
    /// Creates a new resolution error.
    #[must_use]
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }

    /// The member path does not exist in the schema.
    #[must_use]
    pub fn unknown_member(path: impl Into<String>) -> Self {
        Self::new(path, "field does not exist")
    }

    /// A method was called with the wrong number of arguments.
    #[must_use]
    pub fn arity(method: impl Into<String>, expected: &str, found: usize) -> Self {
        Self::new(
            method,
            format!("expected {expected} argument(s), found {found}"),
        )
    }
}

/// Failure of a [`MethodResolver`](crate::resolve::MethodResolver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    /// The method name is not known.
    #[error(transparent)]
    Unknown(#[from] UnknownMethodError),
    /// The method is known but the call was rejected.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Any error produced by a parse call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token sequence is not a valid expression.
    #[error(transparent)]
    Syntax(#[from] ParseSyntaxError),
    /// A method name is not known to any strategy.
    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethodError),
    /// A resolver rejected a member or method.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl From<MethodError> for ParseError {
    fn from(err: MethodError) -> Self {
        match err {
            MethodError::Unknown(e) => Self::UnknownMethod(e),
            MethodError::Resolution(e) => Self::Resolution(e),
        }
    }
}

impl ParseError {
    /// Every parse failure stems from the query text, so retrying the same
    /// input cannot succeed. Callers map this to a 400-class response.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        true
    }

    /// Returns the syntax error, if this is one.
    #[must_use]
    pub const fn as_syntax(&self) -> Option<&ParseSyntaxError> {
        match self {
            Self::Syntax(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the lex error, if this is one.
    #[must_use]
    pub const fn as_lex(&self) -> Option<&LexError> {
        match self {
            Self::Lex(e) => Some(e),
            _ => None,
        }
    }
}
