//! Pratt expression parser for operator precedence.

use crate::ast::Operator;
use crate::lexer::{Token, TokenKind};

/// Returns the prefix binding power for a unary operator.
///
/// Returns `None` if the operator is not unary.
#[must_use]
pub const fn prefix_binding_power(op: Operator) -> Option<u8> {
    match op {
        // Binds tighter than every binary operator
        Operator::Not | Operator::Neg => Some(13),
        _ => None,
    }
}

/// Returns the infix binding power for a binary operator.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the operator is not binary.
#[must_use]
pub const fn infix_binding_power(op: Operator) -> Option<(u8, u8)> {
    match op {
        // Logical OR (lowest precedence)
        Operator::Or => Some((1, 2)),

        // Logical AND
        Operator::And => Some((3, 4)),

        // Equality
        Operator::Eq | Operator::Ne => Some((5, 6)),

        // Relational and membership
        Operator::Lt
        | Operator::Gt
        | Operator::Le
        | Operator::Ge
        | Operator::In
        | Operator::NotIn => Some((7, 8)),

        // Additive
        Operator::Add | Operator::Sub => Some((9, 10)),

        // Multiplicative
        Operator::Mul | Operator::Div | Operator::Mod => Some((11, 12)),

        Operator::Not | Operator::Neg => None,
    }
}

/// Converts a keyword to a binary operator.
#[must_use]
pub fn keyword_to_binary_op(keyword: &str) -> Option<Operator> {
    Operator::from_keyword(keyword).filter(|op| !op.is_unary())
}

/// Converts a token to a binary operator.
#[must_use]
pub fn token_to_binary_op(token: &Token) -> Option<Operator> {
    token.as_identifier().and_then(keyword_to_binary_op)
}

/// Converts a token to a unary operator.
///
/// A folded negative literal is an operand, not an operator.
#[must_use]
pub fn token_to_unary_op(token: &Token) -> Option<Operator> {
    match &token.kind {
        TokenKind::Syntax(syntax) if syntax.is_negative() => Some(Operator::Neg),
        TokenKind::Identifier(ident) if ident.identifier() == "not" => Some(Operator::Not),
        _ => None,
    }
}
