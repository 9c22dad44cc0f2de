//! Visitor contract for consumers that lower the tree.

use super::{Expr, Literal, MemberExpr, MethodCall, Operator};

/// Per-node-kind callbacks, dispatched by [`Expr::accept`].
///
/// Implementors recurse into children themselves, which lets a
/// translation layer choose its own traversal order.
pub trait ExprVisitor {
    /// The value produced for each node.
    type Output;

    fn visit_member(&mut self, member: &MemberExpr) -> Self::Output;

    fn visit_literal(&mut self, literal: &Literal) -> Self::Output;

    fn visit_method_call(&mut self, call: &MethodCall) -> Self::Output;

    fn visit_binary(&mut self, left: &Expr, op: Operator, right: &Expr) -> Self::Output;

    fn visit_unary(&mut self, op: Operator, operand: &Expr) -> Self::Output;

    fn visit_collection(&mut self, items: &[Expr]) -> Self::Output;
}

impl Expr {
    /// Dispatches to the visitor method matching this node's kind.
    pub fn accept<V: ExprVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Member(member) => visitor.visit_member(member),
            Self::Literal(literal) => visitor.visit_literal(literal),
            Self::MethodCall(call) => visitor.visit_method_call(call),
            Self::Binary { left, op, right } => visitor.visit_binary(left, *op, right),
            Self::Unary { op, operand } => visitor.visit_unary(*op, operand),
            Self::Collection(items) => visitor.visit_collection(items),
        }
    }
}
