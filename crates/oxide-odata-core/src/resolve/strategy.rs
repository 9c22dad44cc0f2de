//! Method resolution strategies.
//!
//! A strategy maps source-language method names (`startsWith`,
//! `Math.round`, ...) onto canonical query functions (`startswith`,
//! `round`, ...). [`MethodTable`] is the table-driven implementation the
//! crate ships with.

use std::collections::HashMap;
use std::fmt;

use crate::ast::{Expr, MethodCall};
use crate::error::{MethodError, ResolutionError, UnknownMethodError};

/// A named, stateless method-name translation table.
pub trait MethodStrategy: Send + Sync {
    /// The registration name (`"string"`, `"math"`, ...).
    fn name(&self) -> &str;

    /// True if this strategy knows `method`.
    fn recognizes(&self, method: &str) -> bool;

    /// Builds the canonical call for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`MethodError::Unknown`] if the method is not recognized and
    /// [`MethodError::Resolution`] if the arguments do not fit.
    fn resolve(&self, method: &str, args: Vec<Expr>) -> Result<MethodCall, MethodError>;
}

/// Builds a call from the canonical name and the parsed arguments.
pub type CallBuilder = fn(&'static str, Vec<Expr>) -> MethodCall;

/// Passes the arguments through in source order.
#[must_use]
pub fn direct(canonical: &'static str, args: Vec<Expr>) -> MethodCall {
    MethodCall::new(canonical, args)
}

/// Swaps the first two arguments (`substringof(needle, haystack)` becomes
/// `contains(haystack, needle)`).
#[must_use]
pub fn swapped(canonical: &'static str, mut args: Vec<Expr>) -> MethodCall {
    if args.len() >= 2 {
        args.swap(0, 1);
    }
    MethodCall::new(canonical, args)
}

/// One entry of a [`MethodTable`].
#[derive(Clone, Copy)]
pub struct MethodSpec {
    /// The canonical name emitted in the tree.
    pub canonical: &'static str,
    /// Minimum argument count.
    pub min_args: usize,
    /// Maximum argument count; `None` for variadic methods.
    pub max_args: Option<usize>,
    build: CallBuilder,
}

impl MethodSpec {
    /// Creates an entry accepting `min_args..=max_args` arguments.
    #[must_use]
    pub const fn new(canonical: &'static str, min_args: usize, max_args: usize) -> Self {
        Self {
            canonical,
            min_args,
            max_args: Some(max_args),
            build: direct,
        }
    }

    /// Creates an entry accepting exactly `args` arguments.
    #[must_use]
    pub const fn exact(canonical: &'static str, args: usize) -> Self {
        Self::new(canonical, args, args)
    }

    /// Creates an entry accepting `min_args` or more arguments.
    #[must_use]
    pub const fn variadic(canonical: &'static str, min_args: usize) -> Self {
        Self {
            canonical,
            min_args,
            max_args: None,
            build: direct,
        }
    }

    /// Replaces the call builder.
    #[must_use]
    pub const fn with_builder(mut self, build: CallBuilder) -> Self {
        self.build = build;
        self
    }

    fn arity(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{}..={max}", self.min_args),
            None => format!("at least {}", self.min_args),
        }
    }

    /// Checks the argument count and builds the call.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the argument count is out of range.
    pub fn construct(&self, method: &str, args: Vec<Expr>) -> Result<MethodCall, ResolutionError> {
        let count = args.len();
        if count < self.min_args || self.max_args.is_some_and(|max| count > max) {
            return Err(ResolutionError::arity(method, &self.arity(), count));
        }
        Ok((self.build)(self.canonical, args))
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("canonical", &self.canonical)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// A strategy backed by a name -> [`MethodSpec`] table.
///
/// Lookups ignore ASCII case and any qualifier before the last `.`, so
/// `Math.round`, `round` and `ROUND` all hit the same entry.
#[derive(Debug, Clone)]
pub struct MethodTable {
    name: String,
    entries: HashMap<String, MethodSpec>,
}

impl MethodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Adds (or replaces) an entry.
    #[must_use]
    pub fn method(mut self, source: &str, spec: MethodSpec) -> Self {
        self.entries.insert(source.to_ascii_lowercase(), spec);
        self
    }

    /// Adds several source names for the same spec.
    #[must_use]
    pub fn aliases(self, sources: &[&str], spec: MethodSpec) -> Self {
        sources
            .iter()
            .fold(self, |table, source| table.method(source, spec))
    }

    /// Returns the entry for `method`.
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&MethodSpec> {
        self.entries.get(&lookup_key(method))
    }

    /// Number of source names in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// String methods.
    #[must_use]
    pub fn string() -> Self {
        Self::new("string")
            .aliases(&["startsWith"], MethodSpec::exact("startswith", 2))
            .aliases(&["endsWith"], MethodSpec::exact("endswith", 2))
            .aliases(
                &["toLowerCase", "toLocaleLowerCase", "tolower"],
                MethodSpec::exact("toLower", 1),
            )
            .aliases(
                &["toUpperCase", "toLocaleUpperCase", "toupper"],
                MethodSpec::exact("toUpper", 1),
            )
            .aliases(&["indexOf", "indexOfBytes"], MethodSpec::exact("indexOfBytes", 2))
            .aliases(&["substr", "substring"], MethodSpec::new("substr", 2, 3))
            .aliases(&["trim"], MethodSpec::exact("trim", 1))
            .aliases(&["concat"], MethodSpec::variadic("concat", 2))
            .aliases(&["includes", "contains"], MethodSpec::exact("contains", 2))
            .aliases(
                &["substringof"],
                MethodSpec::exact("contains", 2).with_builder(swapped),
            )
            .aliases(&["length"], MethodSpec::exact("length", 1))
    }

    /// Numeric methods.
    #[must_use]
    pub fn math() -> Self {
        Self::new("math")
            .aliases(&["round"], MethodSpec::new("round", 1, 2))
            .aliases(&["ceil", "ceiling"], MethodSpec::exact("ceil", 1))
            .aliases(&["floor"], MethodSpec::exact("floor", 1))
            .aliases(&["add"], MethodSpec::exact("add", 2))
            .aliases(&["subtract"], MethodSpec::exact("subtract", 2))
            .aliases(&["multiply"], MethodSpec::exact("multiply", 2))
            .aliases(&["divide"], MethodSpec::exact("divide", 2))
            .aliases(&["bitAnd"], MethodSpec::exact("bitAnd", 2))
    }

    /// Date part extraction.
    #[must_use]
    pub fn date() -> Self {
        Self::new("date")
            .aliases(&["getFullYear", "year"], MethodSpec::exact("year", 1))
            .aliases(&["getMonth", "month"], MethodSpec::exact("month", 1))
            .aliases(&["getDate", "day"], MethodSpec::exact("day", 1))
            .aliases(&["getHours", "hour"], MethodSpec::exact("hour", 1))
            .aliases(&["getMinutes", "minute"], MethodSpec::exact("minute", 1))
            .aliases(&["getSeconds", "second"], MethodSpec::exact("second", 1))
            .aliases(&["date"], MethodSpec::exact("date", 1))
            .aliases(&["time"], MethodSpec::exact("time", 1))
            .aliases(&["now"], MethodSpec::exact("now", 0))
    }
}

fn lookup_key(method: &str) -> String {
    method
        .rsplit('.')
        .next()
        .unwrap_or(method)
        .to_ascii_lowercase()
}

impl MethodStrategy for MethodTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognizes(&self, method: &str) -> bool {
        self.get(method).is_some()
    }

    fn resolve(&self, method: &str, args: Vec<Expr>) -> Result<MethodCall, MethodError> {
        let spec = self
            .get(method)
            .ok_or_else(|| UnknownMethodError::new(method, vec![self.name.clone()]))?;
        Ok(spec.construct(method, args)?)
    }
}
