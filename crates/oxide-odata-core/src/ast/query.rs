//! `$orderby` and `$select` items.

use serde::Serialize;

use super::Expr;

/// Order direction for `$orderby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Parses `asc` or `desc`.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Returns the OData keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// An `$orderby` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByItem {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction.
    pub direction: OrderDirection,
}

/// A `$select` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectItem {
    /// The selected expression.
    pub expr: Expr,
    /// Optional `as` alias.
    pub alias: Option<String>,
}
