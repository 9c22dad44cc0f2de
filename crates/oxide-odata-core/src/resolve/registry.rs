//! Ordered registry of method strategies.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use super::{MethodResolver, MethodStrategy, MethodTable};
use crate::ast::{Expr, MethodCall};
use crate::error::{MethodError, UnknownMethodError};

/// The default [`MethodResolver`]: tries each registered strategy in
/// registration order and uses the first one that recognizes the name.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn MethodStrategy>>,
}

impl StrategyRegistry {
    /// Creates an empty registry. Every method is unknown to it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the `string`, `math` and `date` tables, in
    /// that order.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with(MethodTable::string())
            .with(MethodTable::math())
            .with(MethodTable::date())
    }

    /// Registers a strategy.
    ///
    /// A strategy with the same name is replaced in place, keeping its
    /// priority; otherwise the new strategy goes last.
    pub fn register(&mut self, strategy: impl MethodStrategy + 'static) {
        self.register_arc(Arc::new(strategy));
    }

    /// Registers an already shared strategy.
    pub fn register_arc(&mut self, strategy: Arc<dyn MethodStrategy>) {
        match self
            .strategies
            .iter_mut()
            .find(|existing| existing.name() == strategy.name())
        {
            Some(slot) => *slot = strategy,
            None => self.strategies.push(strategy),
        }
    }

    /// Registers a strategy, builder style.
    #[must_use]
    pub fn with(mut self, strategy: impl MethodStrategy + 'static) -> Self {
        self.register(strategy);
        self
    }

    /// Removes the strategy named `name`, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn MethodStrategy>> {
        let index = self.strategies.iter().position(|s| s.name() == name)?;
        Some(self.strategies.remove(index))
    }

    /// Returns the strategy named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn MethodStrategy>> {
        self.strategies.iter().find(|s| s.name() == name)
    }

    /// Strategy names in priority order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.strategies.iter().map(|s| s.name().to_string()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Resolves `method` with the first strategy that recognizes it.
    ///
    /// # Errors
    ///
    /// Returns [`MethodError::Unknown`] listing every consulted strategy if
    /// none recognizes the name, or the strategy's own error.
    pub fn resolve(&self, method: &str, args: Vec<Expr>) -> Result<MethodCall, MethodError> {
        match self.strategies.iter().find(|s| s.recognizes(method)) {
            Some(strategy) => {
                trace!(method, strategy = strategy.name(), "Resolving method");
                strategy.resolve(method, args)
            }
            None => Err(UnknownMethodError::new(method, self.names()).into()),
        }
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[async_trait]
impl MethodResolver for StrategyRegistry {
    async fn resolve_method(&self, name: &str, args: Vec<Expr>) -> Result<MethodCall, MethodError> {
        self.resolve(name, args)
    }
}
