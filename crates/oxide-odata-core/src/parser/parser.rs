//! OData query parser.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::session::ParseSession;
use super::ParserOptions;
use crate::ast::{Expr, OrderByItem, SelectItem};
use crate::error::{LexError, LexErrorKind, ParseError};
use crate::lexer::{Lexer, Token};
use crate::resolve::{MemberResolver, MethodResolver, PassThroughResolver, StrategyRegistry};

/// The result of parsing a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedExpression {
    /// The input held no tokens: no filter.
    Empty,
    /// A complete, resolved expression tree.
    Tree(Expr),
}

impl ParsedExpression {
    /// True for [`ParsedExpression::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the tree, if any.
    #[must_use]
    pub fn into_option(self) -> Option<Expr> {
        match self {
            Self::Empty => None,
            Self::Tree(expr) => Some(expr),
        }
    }
}

impl From<Option<Expr>> for ParsedExpression {
    fn from(expr: Option<Expr>) -> Self {
        expr.map_or(Self::Empty, Self::Tree)
    }
}

/// Compiles OData query text into expression trees.
///
/// The parser holds no per-parse state: each call lexes its input and
/// runs its own session, so one parser can serve concurrent calls.
///
/// # Example
///
/// ```rust
/// use oxide_odata_core::ast::Expr;
/// use oxide_odata_core::parser::{OpenDataParser, ParsedExpression};
///
/// # futures::executor::block_on(async {
/// let parser = OpenDataParser::new();
/// let parsed = parser.parse("startswith(name,'A') and age gt 10").await.unwrap();
/// let expected = Expr::method("startswith", vec![Expr::member("name"), Expr::string("A")])
///     .and(Expr::member("age").gt(Expr::int(10)));
/// assert_eq!(parsed, ParsedExpression::Tree(expected));
/// # });
/// ```
#[derive(Clone)]
pub struct OpenDataParser {
    members: Arc<dyn MemberResolver>,
    methods: Arc<dyn MethodResolver>,
    options: ParserOptions,
}

impl Default for OpenDataParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenDataParser {
    /// Creates a parser that accepts every member and resolves methods with
    /// [`StrategyRegistry::with_defaults`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Arc::new(PassThroughResolver),
            methods: Arc::new(StrategyRegistry::with_defaults()),
            options: ParserOptions::default(),
        }
    }

    /// Replaces the member resolver.
    #[must_use]
    pub fn with_member_resolver(mut self, resolver: impl MemberResolver + 'static) -> Self {
        self.members = Arc::new(resolver);
        self
    }

    /// Replaces the method resolver.
    #[must_use]
    pub fn with_method_resolver(mut self, resolver: impl MethodResolver + 'static) -> Self {
        self.methods = Arc::new(resolver);
        self
    }

    /// Replaces the parser limits.
    #[must_use]
    pub const fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// The parser limits.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a `$filter` expression.
    ///
    /// Empty or whitespace-only input yields [`ParsedExpression::Empty`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text cannot be tokenized, is not a
    /// valid expression, or a resolver rejects a member or method. No
    /// partial tree is returned.
    pub async fn parse(&self, text: &str) -> Result<ParsedExpression, ParseError> {
        let tokens = self.tokenize(text)?;
        debug!(length = text.len(), tokens = tokens.len(), "Parsing filter");
        let mut session = self.session(text, tokens);
        let result = session.parse_filter().await;
        debug!(state = ?session.state(), ok = result.is_ok(), "Parsed filter");
        Ok(result?.into())
    }

    /// Parses a `$orderby` list such as `name asc, created desc`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] as [`OpenDataParser::parse`] does.
    pub async fn parse_order_by(&self, text: &str) -> Result<Vec<OrderByItem>, ParseError> {
        let tokens = self.tokenize(text)?;
        debug!(length = text.len(), tokens = tokens.len(), "Parsing order by");
        let mut session = self.session(text, tokens);
        let result = session.parse_order_by().await;
        debug!(state = ?session.state(), ok = result.is_ok(), "Parsed order by");
        result
    }

    /// Parses a `$select` list such as `name, author/name as writer`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] as [`OpenDataParser::parse`] does.
    pub async fn parse_select(&self, text: &str) -> Result<Vec<SelectItem>, ParseError> {
        let tokens = self.tokenize(text)?;
        debug!(length = text.len(), tokens = tokens.len(), "Parsing select");
        let mut session = self.session(text, tokens);
        let result = session.parse_select().await;
        debug!(state = ?session.state(), ok = result.is_ok(), "Parsed select");
        result
    }

    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LexError> {
        let limit = self.options.max_length;
        if text.chars().count() > limit {
            return Err(LexError::new(LexErrorKind::InputTooLong { limit }, limit));
        }
        Lexer::new(text).tokenize()
    }

    fn session<'p>(&'p self, text: &'p str, tokens: Vec<Token>) -> ParseSession<'p> {
        ParseSession::new(
            text,
            tokens,
            self.members.as_ref(),
            self.methods.as_ref(),
            self.options,
        )
    }
}

impl fmt::Debug for OpenDataParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenDataParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ast::{Literal, MemberExpr, MethodCall, Operator, OrderDirection};
    use crate::error::{MethodError, ResolutionError};
    use crate::resolve::FieldMapResolver;

    async fn parse(text: &str) -> Result<ParsedExpression, ParseError> {
        OpenDataParser::new().parse(text).await
    }

    async fn tree(text: &str) -> Expr {
        parse(text).await.unwrap().into_option().unwrap()
    }

    #[tokio::test]
    async fn test_simple_comparison() {
        assert_eq!(
            tree("name eq 'x'").await,
            Expr::member("name").eq(Expr::string("x"))
        );
    }

    #[tokio::test]
    async fn test_and_binds_tighter_than_or() {
        assert_eq!(
            tree("a eq 1 or b eq 2 and c eq 3").await,
            tree("a eq 1 or (b eq 2 and c eq 3)").await
        );
    }

    #[tokio::test]
    async fn test_left_associativity() {
        let expected = Expr::binary(
            Expr::binary(Expr::member("a"), Operator::Sub, Expr::member("b")),
            Operator::Sub,
            Expr::member("c"),
        );
        assert_eq!(tree("a sub b sub c").await, expected);
    }

    #[tokio::test]
    async fn test_arithmetic_precedence() {
        let expected = Expr::binary(
            Expr::member("a"),
            Operator::Add,
            Expr::binary(Expr::member("b"), Operator::Mul, Expr::member("c")),
        )
        .gt(Expr::int(5));
        assert_eq!(tree("a add b mul c gt 5").await, expected);
    }

    #[tokio::test]
    async fn test_empty_input() {
        assert_eq!(parse("").await, Ok(ParsedExpression::Empty));
        assert!(parse("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_paren() {
        let err = parse("(a eq 1").await.unwrap_err();
        assert_eq!(err.as_syntax().unwrap().token_index, 4);

        let err = parse("a eq 1)").await.unwrap_err();
        let err = err.as_syntax().unwrap();
        assert_eq!(err.token_index, 3);
        assert_eq!(err.message, "unmatched ')'");
    }

    #[tokio::test]
    async fn test_dangling_operator() {
        let err = parse("a eq").await.unwrap_err();
        let err = err.as_syntax().unwrap();
        assert_eq!(err.token_index, 2);
        assert_eq!(err.found, None);
    }

    #[tokio::test]
    async fn test_operator_in_operand_position() {
        let err = parse("eq 1").await.unwrap_err();
        assert_eq!(err.as_syntax().unwrap().found.as_deref(), Some("eq"));
    }

    #[tokio::test]
    async fn test_not_and_negation() {
        assert_eq!(
            tree("not active").await,
            Expr::member("active").not()
        );
        assert_eq!(
            tree("-price").await,
            Expr::unary(Operator::Neg, Expr::member("price"))
        );
        assert_eq!(
            tree("-(a add b)").await,
            Expr::unary(
                Operator::Neg,
                Expr::binary(Expr::member("a"), Operator::Add, Expr::member("b"))
            )
        );
        assert_eq!(tree("a eq -5").await, Expr::member("a").eq(Expr::int(-5)));
    }

    #[tokio::test]
    async fn test_in_requires_list() {
        assert_eq!(
            tree("status in ('a','b')").await,
            Expr::binary(
                Expr::member("status"),
                Operator::In,
                Expr::Collection(vec![Expr::string("a"), Expr::string("b")])
            )
        );
        assert!(parse("status in 'a'").await.is_err());
    }

    #[tokio::test]
    async fn test_method_call() {
        assert_eq!(
            tree("startswith(name,'A')").await,
            Expr::method("startswith", vec![Expr::member("name"), Expr::string("A")])
        );
        assert_eq!(
            tree("toLowerCase(name) eq 'bob'").await,
            Expr::method("toLower", vec![Expr::member("name")]).eq(Expr::string("bob"))
        );
        assert_eq!(tree("now() gt 1").await, Expr::method("now", vec![]).gt(Expr::int(1)));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let err = parse("frobnicate(name)").await.unwrap_err();
        let ParseError::UnknownMethod(err) = err else {
            panic!("expected unknown method, got {err:?}");
        };
        assert_eq!(err.method, "frobnicate");
    }

    #[tokio::test]
    async fn test_malformed_argument_list() {
        let err = parse("trim(name name)").await.unwrap_err();
        assert_eq!(err.as_syntax().unwrap().expected.as_deref(), Some("',' or ')'"));
        assert!(parse("concat(a,").await.is_err());
    }

    #[tokio::test]
    async fn test_lex_error_is_reported() {
        let err = parse("name eq 'x").await.unwrap_err();
        assert!(err.as_lex().is_some());
    }

    #[tokio::test]
    async fn test_input_too_long() {
        let parser = OpenDataParser::new().with_options(ParserOptions::new().max_length(5));
        let err = parser.parse("name eq 'x'").await.unwrap_err();
        assert_eq!(
            err.as_lex().unwrap().kind,
            LexErrorKind::InputTooLong { limit: 5 }
        );
    }

    #[tokio::test]
    async fn test_nesting_limit() {
        let parser = OpenDataParser::new().with_options(ParserOptions::new().max_depth(3));
        assert!(parser.parse("((a))").await.is_ok());
        assert!(parser.parse("(((a)))").await.is_err());
    }

    #[tokio::test]
    async fn test_field_map_resolver() {
        let parser = OpenDataParser::new()
            .with_member_resolver(FieldMapResolver::new().alias("email", "email_address"));
        assert_eq!(
            parser.parse("email eq 'a'").await.unwrap().into_option().unwrap(),
            Expr::Member(MemberExpr::from_path("email_address")).eq(Expr::string("a"))
        );
        let err = parser.parse("password eq 'a'").await.unwrap_err();
        assert!(matches!(err, ParseError::Resolution(ref e) if e.target == "password"));
    }

    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MemberResolver for Recording {
        async fn resolve_member(&self, path: &[String]) -> Result<MemberExpr, ResolutionError> {
            self.calls.lock().unwrap().push(path.join("/"));
            Ok(MemberExpr::new(path.to_vec()))
        }
    }

    #[async_trait]
    impl MethodResolver for Recording {
        async fn resolve_method(&self, name: &str, args: Vec<Expr>) -> Result<MethodCall, MethodError> {
            self.calls.lock().unwrap().push(format!("{name}()"));
            Ok(MethodCall::new(name, args))
        }
    }

    #[tokio::test]
    async fn test_resolution_order() {
        let recording = Arc::new(Recording {
            calls: Mutex::new(Vec::new()),
        });
        let parser = OpenDataParser {
            members: recording.clone(),
            methods: recording.clone(),
            options: ParserOptions::default(),
        };
        parser
            .parse("f(a, g(b), c) eq d/e")
            .await
            .unwrap();
        assert_eq!(
            *recording.calls.lock().unwrap(),
            vec!["a", "b", "g()", "c", "f()", "d/e"]
        );
    }

    #[tokio::test]
    async fn test_order_by() {
        let items = OpenDataParser::new()
            .parse_order_by("name, created desc, round(price) asc")
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].direction, OrderDirection::Asc);
        assert_eq!(items[1].expr, Expr::member("created"));
        assert_eq!(items[1].direction, OrderDirection::Desc);
        assert_eq!(items[2].expr, Expr::method("round", vec![Expr::member("price")]));
    }

    #[tokio::test]
    async fn test_select() {
        let items = OpenDataParser::new()
            .parse_select("name, author/name as writer")
            .await
            .unwrap();
        assert_eq!(items[0].alias, None);
        assert_eq!(items[1].expr, Expr::member("author/name"));
        assert_eq!(items[1].alias.as_deref(), Some("writer"));

        assert!(OpenDataParser::new().parse_select("name as").await.is_err());
        assert!(OpenDataParser::new().parse_select("name as eq").await.is_err());
    }

    #[tokio::test]
    async fn test_literal_values() {
        assert_eq!(
            tree("x eq 5L").await,
            Expr::member("x").eq(Expr::literal(Literal::Long(5)))
        );
        assert_eq!(tree("x eq '5'").await, Expr::member("x").eq(Expr::string("5")));
    }
}
