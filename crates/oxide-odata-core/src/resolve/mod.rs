//! Member and method resolution.
//!
//! The parser never decides on its own whether a field exists or what a
//! method is called downstream. It hands member paths to a
//! [`MemberResolver`] and method calls to a [`MethodResolver`], both
//! supplied by the caller.

mod member;
mod registry;
mod strategy;

use async_trait::async_trait;

use crate::ast::{Expr, MethodCall};
use crate::error::MethodError;

pub use member::{FieldMapResolver, MemberResolver, PassThroughResolver};
pub use registry::StrategyRegistry;
pub use strategy::{direct, swapped, CallBuilder, MethodSpec, MethodStrategy, MethodTable};

/// Maps a source method call onto its canonical form.
#[async_trait]
pub trait MethodResolver: Send + Sync {
    /// Resolves `name` applied to the already resolved `args`.
    ///
    /// # Errors
    ///
    /// Returns [`MethodError`] if the method is unknown or the call is
    /// rejected. The error aborts the parse.
    async fn resolve_method(&self, name: &str, args: Vec<Expr>) -> Result<MethodCall, MethodError>;
}
