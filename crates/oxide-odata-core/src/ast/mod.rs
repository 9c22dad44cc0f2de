//! Abstract Syntax Tree (AST) types for query expressions.

mod expression;
mod literal;
mod query;
mod visit;

pub use expression::{Expr, MemberExpr, MethodCall, Operator};
pub use literal::{DateTimeValue, InvalidDuration, IsoDuration, Literal};
pub use query::{OrderByItem, OrderDirection, SelectItem};
pub use visit::ExprVisitor;
