//! OData Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for OData query text that
//! produces a flat list of tokens.

pub mod chars;
mod cursor;
mod literal;
mod span;
mod token;
mod tokenizer;

pub use cursor::Cursor;
pub use span::Span;
pub use token::{
    IdentifierToken, LiteralToken, LiteralType, SyntaxToken, Token, TokenKind, TokenType,
};
pub use tokenizer::Lexer;
