//! A single parse over a token list.
//!
//! The session owns the tokens and its position; resolvers are borrowed
//! from the [`OpenDataParser`](super::OpenDataParser) that started it. Each
//! resolver call is awaited before the next token is looked at, so member
//! and method resolution happens strictly in source order.

use futures::future::BoxFuture;
use tracing::trace;

use super::pratt::{
    infix_binding_power, keyword_to_binary_op, prefix_binding_power, token_to_binary_op,
    token_to_unary_op,
};
use super::ParserOptions;
use crate::ast::{Expr, Operator, OrderByItem, OrderDirection, SelectItem};
use crate::error::{LexError, ParseError, ParseSyntaxError};
use crate::lexer::{IdentifierToken, Token, TokenKind};
use crate::resolve::{MemberResolver, MethodResolver};

/// Where a parse session currently is.
///
/// `Error` is absorbing: once entered, no further transition happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Created, nothing consumed.
    AtStart,
    /// Looking at the token list as a whole.
    Scanning,
    /// Inside an operand or operator chain.
    ParsingExpression,
    /// Between the parentheses of a method call or value list.
    ParsingMethodArguments,
    /// Waiting on the member resolver.
    ParsingMember,
    /// Finished successfully.
    AtEnd,
    /// Finished with an error.
    Error,
}

pub(crate) struct ParseSession<'p> {
    source: &'p str,
    tokens: Vec<Token>,
    /// Index of the current token.
    index: usize,
    /// Current expression nesting depth.
    depth: usize,
    state: ParserState,
    members: &'p dyn MemberResolver,
    methods: &'p dyn MethodResolver,
    options: ParserOptions,
}

impl<'p> ParseSession<'p> {
    pub(crate) fn new(
        source: &'p str,
        tokens: Vec<Token>,
        members: &'p dyn MemberResolver,
        methods: &'p dyn MethodResolver,
        options: ParserOptions,
    ) -> Self {
        Self {
            source,
            tokens,
            index: 0,
            depth: 0,
            state: ParserState::AtStart,
            members,
            methods,
            options,
        }
    }

    pub(crate) const fn state(&self) -> ParserState {
        self.state
    }

    /// Parses a filter expression; `None` when there are no tokens.
    pub(crate) async fn parse_filter(&mut self) -> Result<Option<Expr>, ParseError> {
        self.transition(ParserState::Scanning);
        let result = if self.tokens.is_empty() {
            Ok(None)
        } else {
            self.filter().await.map(Some)
        };
        self.finish(result)
    }

    /// Parses a comma-separated `$orderby` list.
    pub(crate) async fn parse_order_by(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        self.transition(ParserState::Scanning);
        let result = self.order_by().await;
        self.finish(result)
    }

    /// Parses a comma-separated `$select` list.
    pub(crate) async fn parse_select(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        self.transition(ParserState::Scanning);
        let result = self.select().await;
        self.finish(result)
    }

    async fn filter(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression(0).await?;
        self.expect_end()?;
        Ok(expr)
    }

    async fn order_by(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        let mut items = Vec::new();
        if self.tokens.is_empty() {
            return Ok(items);
        }
        loop {
            let expr = self.parse_expression(0).await?;
            let direction = self
                .current()
                .and_then(Token::as_identifier)
                .and_then(OrderDirection::from_keyword);
            if direction.is_some() {
                self.advance();
            }
            items.push(OrderByItem {
                expr,
                direction: direction.unwrap_or_default(),
            });
            if !self.eat_comma() {
                break;
            }
        }
        self.expect_end()?;
        Ok(items)
    }

    async fn select(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = Vec::new();
        if self.tokens.is_empty() {
            return Ok(items);
        }
        loop {
            let expr = self.parse_expression(0).await?;
            let alias = if self.current().and_then(Token::as_identifier) == Some("as") {
                self.advance();
                Some(self.expect_alias()?)
            } else {
                None
            };
            items.push(SelectItem { expr, alias });
            if !self.eat_comma() {
                break;
            }
        }
        self.expect_end()?;
        Ok(items)
    }

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> BoxFuture<'_, Result<Expr, ParseError>> {
        Box::pin(async move {
            self.enter()?;
            self.transition(ParserState::ParsingExpression);

            // Parse prefix (primary expression or unary operator)
            let mut lhs = self.parse_prefix().await?;

            // Parse infix operators
            while let Some(op) = self.current().and_then(token_to_binary_op) {
                let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                    break;
                };
                if l_bp < min_bp {
                    break;
                }
                self.advance();

                // Both operands are resolved before the node is built
                let rhs = if matches!(op, Operator::In | Operator::NotIn) {
                    self.parse_value_list().await?
                } else {
                    self.parse_expression(r_bp).await?
                };
                lhs = Expr::binary(lhs, op, rhs);
            }

            self.depth -= 1;
            Ok(lhs)
        })
    }

    /// Parses a prefix expression.
    async fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let unary = self
            .current()
            .and_then(token_to_unary_op)
            .and_then(|op| Some((op, prefix_binding_power(op)?)));
        if let Some((op, bp)) = unary {
            self.advance();
            let operand = self.parse_expression(bp).await?;
            return Ok(Expr::unary(op, operand));
        }

        self.parse_primary().await
    }

    /// Parses a primary expression.
    async fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let index = self.index;
        let Some(token) = self.advance() else {
            return Err(ParseSyntaxError::unexpected_end("an operand", index).into());
        };

        match token.kind {
            TokenKind::Literal(literal) => literal.value().map(Expr::Literal).map_err(|kind| {
                ParseError::from(LexError::new(kind, token.span.char_start(self.source)))
            }),
            TokenKind::Syntax(syntax) if syntax.is_paren_open() => {
                let expr = self.parse_expression(0).await?;
                self.expect_paren_close(index)?;
                Ok(expr)
            }
            TokenKind::Syntax(syntax) => Err(ParseSyntaxError::unexpected(
                "an operand",
                syntax.syntax().to_string(),
                index,
            )
            .into()),
            TokenKind::Identifier(ident) => {
                // An operator keyword cannot start an operand, so `add(..)`
                // here can only be a call to the `add` method.
                if self.current().is_some_and(Token::is_paren_open) {
                    self.parse_method_call(ident).await
                } else if keyword_to_binary_op(ident.identifier()).is_some() {
                    Err(ParseSyntaxError::unexpected("an operand", ident.identifier(), index)
                        .into())
                } else {
                    self.parse_member(&ident).await
                }
            }
        }
    }

    /// Parses `name(args...)` and hands it to the method resolver.
    async fn parse_method_call(&mut self, ident: IdentifierToken) -> Result<Expr, ParseError> {
        self.advance(); // consume (
        let args = self.parse_list(ParserState::ParsingMethodArguments).await?;

        let name = ident.identifier();
        trace!(method = name, args = args.len(), "Resolving method");
        let call = self.methods.resolve_method(name, args).await?;
        self.transition(ParserState::ParsingExpression);
        Ok(Expr::MethodCall(call))
    }

    /// Hands a member path to the member resolver.
    async fn parse_member(&mut self, ident: &IdentifierToken) -> Result<Expr, ParseError> {
        self.transition(ParserState::ParsingMember);
        let path: Vec<String> = ident.segments().map(String::from).collect();
        trace!(member = ident.identifier(), "Resolving member");
        let member = self.members.resolve_member(&path).await?;
        self.transition(ParserState::ParsingExpression);
        Ok(Expr::Member(member))
    }

    /// Parses the parenthesized right operand of `in`/`nin`.
    async fn parse_value_list(&mut self) -> Result<Expr, ParseError> {
        match self.current() {
            Some(token) if token.is_paren_open() => {
                self.advance();
            }
            Some(token) => {
                return Err(
                    ParseSyntaxError::unexpected("'('", token.to_string(), self.index).into(),
                );
            }
            None => return Err(ParseSyntaxError::unexpected_end("'('", self.index).into()),
        }
        let items = self.parse_list(ParserState::ParsingMethodArguments).await?;
        self.transition(ParserState::ParsingExpression);
        Ok(Expr::Collection(items))
    }

    /// Parses a comma-separated list after its `(` up to and including the
    /// closing `)`. Items are parsed left to right.
    async fn parse_list(&mut self, state: ParserState) -> Result<Vec<Expr>, ParseError> {
        self.transition(state);
        let mut items = Vec::new();
        if self.current().is_some_and(Token::is_paren_close) {
            self.advance();
            return Ok(items);
        }
        loop {
            items.push(self.parse_expression(0).await?);
            self.transition(state);
            match self.current() {
                Some(token) if token.is_comma() => {
                    self.advance();
                }
                Some(token) if token.is_paren_close() => {
                    self.advance();
                    return Ok(items);
                }
                Some(token) => {
                    return Err(ParseSyntaxError::unexpected(
                        "',' or ')'",
                        token.to_string(),
                        self.index,
                    )
                    .into());
                }
                None => {
                    return Err(ParseSyntaxError::unexpected_end("',' or ')'", self.index).into());
                }
            }
        }
    }

    // --- Helper methods ---

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    fn eat_comma(&mut self) -> bool {
        if self.current().is_some_and(Token::is_comma) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_paren_close(&mut self, open_index: usize) -> Result<(), ParseError> {
        match self.current() {
            Some(token) if token.is_paren_close() => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(ParseSyntaxError::unexpected(
                "')'",
                token.to_string(),
                self.index,
            )
            .into()),
            None => Err(ParseSyntaxError::unexpected_end(
                format!("')' to close '(' at token {open_index}"),
                self.index,
            )
            .into()),
        }
    }

    /// Fails if any token is left over.
    fn expect_end(&self) -> Result<(), ParseError> {
        match self.current() {
            None => Ok(()),
            Some(token) if token.is_paren_close() => {
                Err(ParseSyntaxError::new("unmatched ')'", self.index).into())
            }
            Some(token) => Err(ParseSyntaxError::unexpected(
                "end of input",
                token.to_string(),
                self.index,
            )
            .into()),
        }
    }

    /// Expects a plain identifier usable as a `$select` alias.
    fn expect_alias(&mut self) -> Result<String, ParseError> {
        let index = self.index;
        match self.advance() {
            Some(Token {
                kind: TokenKind::Identifier(ident),
                ..
            }) if !ident.is_path() && Operator::from_keyword(ident.identifier()).is_none() => {
                Ok(ident.identifier().to_string())
            }
            Some(token) => {
                Err(ParseSyntaxError::unexpected("an alias", token.to_string(), index).into())
            }
            None => Err(ParseSyntaxError::unexpected_end("an alias", index).into()),
        }
    }

    /// Enters one level of nesting.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseSyntaxError::new(
                format!("expression nested deeper than {}", self.options.max_depth),
                self.index,
            )
            .into());
        }
        Ok(())
    }

    fn transition(&mut self, next: ParserState) {
        if self.state == next || self.state == ParserState::Error {
            return;
        }
        trace!(from = ?self.state, to = ?next, "Parser state");
        self.state = next;
    }

    fn finish<T>(&mut self, result: Result<T, ParseError>) -> Result<T, ParseError> {
        match &result {
            Ok(_) => self.transition(ParserState::AtEnd),
            Err(err) => {
                trace!(error = %err, "Parse failed");
                self.transition(ParserState::Error);
            }
        }
        result
    }
}
