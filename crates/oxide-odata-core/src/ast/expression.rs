//! Expression AST types.

use std::fmt;

use serde::Serialize;

use super::Literal;

/// Query operators.
///
/// Each operator has a surface keyword (`eq`) and a canonical name (`$eq`)
/// used when the tree is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    // Unary
    #[serde(rename = "$not")]
    Not,
    #[serde(rename = "$neg")]
    Neg,

    // Arithmetic
    #[serde(rename = "$multiply")]
    Mul,
    #[serde(rename = "$divide")]
    Div,
    #[serde(rename = "$mod")]
    Mod,
    #[serde(rename = "$add")]
    Add,
    #[serde(rename = "$subtract")]
    Sub,

    // Comparison
    #[serde(rename = "$lt")]
    Lt,
    #[serde(rename = "$gt")]
    Gt,
    #[serde(rename = "$lte")]
    Le,
    #[serde(rename = "$gte")]
    Ge,
    #[serde(rename = "$eq")]
    Eq,
    #[serde(rename = "$ne")]
    Ne,
    #[serde(rename = "$in")]
    In,
    #[serde(rename = "$nin")]
    NotIn,

    // Logical
    #[serde(rename = "$and")]
    And,
    #[serde(rename = "$or")]
    Or,
}

impl Operator {
    /// Looks up an operator by its surface keyword.
    ///
    /// Keywords are case-sensitive; `-` is not a keyword.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "not" => Some(Self::Not),
            "mul" => Some(Self::Mul),
            "div" => Some(Self::Div),
            "mod" => Some(Self::Mod),
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "lt" => Some(Self::Lt),
            "gt" => Some(Self::Gt),
            "le" => Some(Self::Le),
            "ge" => Some(Self::Ge),
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "in" => Some(Self::In),
            "nin" => Some(Self::NotIn),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    /// Returns the surface keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Neg => "-",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Ge => "ge",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::In => "in",
            Self::NotIn => "nin",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Returns the canonical name emitted in the tree.
    #[must_use]
    pub const fn canonical_name(&self) -> &'static str {
        match self {
            Self::Not => "$not",
            Self::Neg => "$neg",
            Self::Mul => "$multiply",
            Self::Div => "$divide",
            Self::Mod => "$mod",
            Self::Add => "$add",
            Self::Sub => "$subtract",
            Self::Lt => "$lt",
            Self::Gt => "$gt",
            Self::Le => "$lte",
            Self::Ge => "$gte",
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::In => "$in",
            Self::NotIn => "$nin",
            Self::And => "$and",
            Self::Or => "$or",
        }
    }

    /// True for `not` and unary minus.
    #[must_use]
    pub const fn is_unary(&self) -> bool {
        matches!(self, Self::Not | Self::Neg)
    }

    /// True for `and` and `or`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// True for the comparison and membership operators.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Lt | Self::Gt | Self::Le | Self::Ge | Self::Eq | Self::Ne | Self::In | Self::NotIn
        )
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Gt | Self::Le | Self::Ge | Self::In | Self::NotIn => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Mod => 6,
            Self::Not | Self::Neg => 7,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a field or navigation path, as accepted by the member
/// resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MemberExpr {
    /// Path segments, outermost first.
    pub path: Vec<String>,
}

impl MemberExpr {
    /// Creates a member from its segments.
    #[must_use]
    pub fn new(path: Vec<String>) -> Self {
        Self { path }
    }

    /// Creates a member from a `/`-separated path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self::new(path.split('/').map(String::from).collect())
    }

    /// The last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// True if the member navigates through a relation.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        self.path.len() > 1
    }
}

impl fmt::Display for MemberExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join("/"))
    }
}

/// A resolved method call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCall {
    /// The canonical method name.
    pub name: String,
    /// The arguments, in call order.
    pub args: Vec<Expr>,
}

impl MethodCall {
    /// Creates a new method call.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A query expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Expr {
    /// A resolved field or navigation path.
    Member(MemberExpr),

    /// A literal value.
    Literal(Literal),

    /// A resolved method call.
    MethodCall(MethodCall),

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: Operator,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: Operator,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A parenthesised value list, the right operand of `in` and `nin`.
    Collection(Vec<Expr>),
}

impl Expr {
    /// Creates a member reference from a `/`-separated path.
    #[must_use]
    pub fn member(path: &str) -> Self {
        Self::Member(MemberExpr::from_path(path))
    }

    /// Creates a method call.
    #[must_use]
    pub fn method(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::MethodCall(MethodCall::new(name, args))
    }

    /// Creates a literal.
    #[must_use]
    pub const fn literal(value: Literal) -> Self {
        Self::Literal(value)
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates an `Int` literal.
    #[must_use]
    pub const fn int(value: i32) -> Self {
        Self::Literal(Literal::Int(value))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates a null literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(left: Self, op: Operator, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a unary expression.
    #[must_use]
    pub fn unary(op: Operator, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        Self::binary(self, Operator::Eq, right)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn ne(self, right: Self) -> Self {
        Self::binary(self, Operator::Ne, right)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt(self, right: Self) -> Self {
        Self::binary(self, Operator::Lt, right)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        Self::binary(self, Operator::Gt, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        Self::binary(self, Operator::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        Self::binary(self, Operator::Or, right)
    }

    /// Creates a NOT expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::unary(Operator::Not, self)
    }

    /// Binding strength when rendered; primaries bind tightest.
    const fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } | Self::Unary { op, .. } => op.precedence(),
            _ => 8,
        }
    }

    /// Visits this node and every descendant, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        match self {
            Self::MethodCall(call) => call.args.iter().for_each(|arg| arg.walk(f)),
            Self::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            Self::Unary { operand, .. } => operand.walk(f),
            Self::Collection(items) => items.iter().for_each(|item| item.walk(f)),
            Self::Member(_) | Self::Literal(_) => {}
        }
    }

    /// Returns every member referenced by the expression, in source order.
    #[must_use]
    pub fn members(&self) -> Vec<&MemberExpr> {
        let mut members = Vec::new();
        self.walk(&mut |expr| {
            if let Self::Member(member) = expr {
                members.push(member);
            }
        });
        members
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Renders the expression as OData filter text with the fewest
/// parentheses that keep the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(member) => member.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
            Self::MethodCall(call) => {
                write!(f, "{}(", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    arg.fmt(f)?;
                }
                f.write_str(")")
            }
            Self::Binary { left, op, right } => {
                let prec = op.precedence();
                write_operand(f, left, left.precedence() < prec)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right.precedence() <= prec)
            }
            Self::Unary { op, operand } => {
                let wrap = match op {
                    // `-5` would fold back into a negative literal.
                    Operator::Neg => !matches!(**operand, Self::Member(_) | Self::MethodCall(_)),
                    _ => operand.precedence() < op.precedence(),
                };
                match op {
                    Operator::Neg => f.write_str("-")?,
                    _ => write!(f, "{op} ")?,
                }
                write_operand(f, operand, wrap)
            }
            Self::Collection(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}
