//! Loader configuration.

/// Configuration for a [`SchemaLoader`](crate::SchemaLoader).
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Load the builtin module before any user module.
    pub load_builtins: bool,

    /// Expose builtin declarations from materialized schemas by default.
    pub include_builtin: bool,

    /// Reject index expressions that yield non-atomic columns.
    pub require_atomic_indexes: bool,

    /// Reject unknown keys in declarations.
    pub strict_keys: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            load_builtins: true,
            include_builtin: false,
            require_atomic_indexes: true,
            strict_keys: true,
        }
    }
}

impl LoaderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that tolerates unknown keys and non-atomic
    /// index expressions.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            require_atomic_indexes: false,
            strict_keys: false,
            ..Self::default()
        }
    }

    /// Builder method to enable/disable loading builtins.
    #[must_use]
    pub fn with_load_builtins(mut self, load: bool) -> Self {
        self.load_builtins = load;
        self
    }

    /// Builder method to expose builtins from materialized schemas.
    #[must_use]
    pub fn with_include_builtin(mut self, include: bool) -> Self {
        self.include_builtin = include;
        self
    }

    /// Builder method to set the index expression policy.
    #[must_use]
    pub fn with_require_atomic_indexes(mut self, require: bool) -> Self {
        self.require_atomic_indexes = require;
        self
    }

    /// Builder method to enable/disable strict key checking.
    #[must_use]
    pub fn with_strict_keys(mut self, strict: bool) -> Self {
        self.strict_keys = strict;
        self
    }
}
