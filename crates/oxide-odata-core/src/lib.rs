//! # oxide-odata-core
//!
//! An OData query-expression compiler: `$filter`, `$orderby` and `$select`
//! text in, a backend-agnostic expression tree out.
//!
//! This crate provides:
//! - A hand-written lexer for OData literals, member paths and keywords
//! - A recursive descent parser with Pratt expression parsing
//! - Asynchronous, pluggable member and method resolution
//!
//! ## Parsing a filter
//!
//! ```rust
//! use oxide_odata_core::{Expr, OpenDataParser};
//!
//! # futures::executor::block_on(async {
//! let parser = OpenDataParser::new();
//! let tree = parser
//!     .parse("name eq 'x' and (age gt 10 or startsWith(email,'a'))")
//!     .await
//!     .unwrap()
//!     .into_option()
//!     .unwrap();
//!
//! let expected = Expr::member("name").eq(Expr::string("x")).and(
//!     Expr::member("age").gt(Expr::int(10)).or(Expr::method(
//!         "startswith",
//!         vec![Expr::member("email"), Expr::string("a")],
//!     )),
//! );
//! assert_eq!(tree, expected);
//! # });
//! ```
//!
//! ## Method resolution
//!
//! Source method names are mapped onto canonical names by an ordered list
//! of strategies. Register your own to extend or override the defaults:
//!
//! ```rust
//! use oxide_odata_core::resolve::{MethodSpec, MethodTable, StrategyRegistry};
//! use oxide_odata_core::OpenDataParser;
//!
//! let mut registry = StrategyRegistry::with_defaults();
//! registry.register(MethodTable::new("geo").method("distance", MethodSpec::exact("geoDistance", 2)));
//! let parser = OpenDataParser::new().with_method_resolver(registry);
//! # let _ = parser;
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolve;

pub use ast::{Expr, Literal, MemberExpr, MethodCall, Operator};
pub use error::{
    LexError, MethodError, ParseError, ParseSyntaxError, ResolutionError, UnknownMethodError,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{OpenDataParser, ParsedExpression, ParserOptions};
pub use resolve::{MemberResolver, MethodResolver, StrategyRegistry};
