//! Parser limits.

/// Limits applied to every parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting depth of expressions (parentheses, method
    /// arguments, unary chains).
    pub max_depth: usize,
    /// Maximum input length in characters.
    pub max_length: usize,
}

impl ParserOptions {
    /// The default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    /// The default input length limit.
    pub const DEFAULT_MAX_LENGTH: usize = 8192;

    /// Creates options with the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_length: Self::DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the input length limit.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}
