//! Member resolution against a schema.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::ast::MemberExpr;
use crate::error::ResolutionError;

/// Validates or rewrites member paths.
///
/// Implementations usually consult a schema, possibly out of process. The
/// parser awaits each call before continuing, so calls are observed one at
/// a time and in source order.
#[async_trait]
pub trait MemberResolver: Send + Sync {
    /// Resolves the `/`-separated path segments of a member reference.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the path is not valid. The error
    /// aborts the parse.
    async fn resolve_member(&self, path: &[String]) -> Result<MemberExpr, ResolutionError>;
}

/// Accepts every path unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughResolver;

#[async_trait]
impl MemberResolver for PassThroughResolver {
    async fn resolve_member(&self, path: &[String]) -> Result<MemberExpr, ResolutionError> {
        Ok(MemberExpr::new(path.to_vec()))
    }
}

/// Resolves members from a fixed field map.
///
/// Keys are full `/`-joined paths as written in queries; values are the
/// storage column (or path) they map to.
///
/// # Example
///
/// ```rust
/// use oxide_odata_core::resolve::FieldMapResolver;
///
/// let resolver = FieldMapResolver::new()
///     .field("name")
///     .alias("email", "email_address")
///     .alias("author/name", "author/full_name");
/// assert_eq!(resolver.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldMapResolver {
    fields: HashMap<String, String>,
    lenient: bool,
}

impl FieldMapResolver {
    /// Creates a strict resolver with no known fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field that maps to itself.
    #[must_use]
    pub fn field(self, name: &str) -> Self {
        self.alias(name, name)
    }

    /// Adds a field exposed under `alias` and stored as `column`.
    #[must_use]
    pub fn alias(mut self, alias: &str, column: &str) -> Self {
        self.fields.insert(alias.to_string(), column.to_string());
        self
    }

    /// Passes unknown fields through instead of rejecting them.
    #[must_use]
    pub const fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    /// Number of known fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[async_trait]
impl MemberResolver for FieldMapResolver {
    async fn resolve_member(&self, path: &[String]) -> Result<MemberExpr, ResolutionError> {
        let joined = path.join("/");
        match self.fields.get(&joined) {
            Some(column) => Ok(MemberExpr::from_path(column)),
            None if self.lenient => {
                warn!(member = %joined, "Unknown field passed through");
                Ok(MemberExpr::new(path.to_vec()))
            }
            None => Err(ResolutionError::unknown_member(joined)),
        }
    }
}
