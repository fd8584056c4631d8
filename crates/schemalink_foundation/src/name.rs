//! Qualified declaration names.
//!
//! Every declaration lives in a module and is addressed as `module.name`.
//! The module part may itself be dotted (`acme.people`); the local part
//! never contains a dot, so parsing splits at the last one.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fully qualified declaration name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Name {
    module: String,
    name: String,
}

impl Name {
    /// Creates a name from its module and local parts.
    #[must_use]
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Parses a dotted `module.name` string.
    ///
    /// Returns `None` for unqualified names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (module, name) = s.rsplit_once('.')?;
        if module.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(module, name))
    }

    /// Returns true if `s` carries a module prefix.
    #[must_use]
    pub fn is_qualified(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// The module part.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The local (unqualified) part.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derives the name of a pointer specialization.
    ///
    /// The result depends only on `(source, pointer, target)` and lives in
    /// the pointer's module. Computables have no target.
    #[must_use]
    pub fn specialized(source: &Name, pointer: &Name, target: Option<&Name>) -> Self {
        let target = target.map_or_else(String::new, Name::mangled);
        Self::new(
            pointer.module.clone(),
            format!("({})|({})|({target})", source.mangled(), pointer.mangled()),
        )
    }

    /// Derives the name of an automatic atom generated for `pointer` on `host`.
    #[must_use]
    pub fn generated(host: &Name, pointer: &str) -> Self {
        Self::new(host.module.clone(), format!("{}__{pointer}", host.name))
    }

    /// Returns true if this name was produced by [`Name::specialized`].
    #[must_use]
    pub fn is_specialized(&self) -> bool {
        self.name.starts_with('(') && self.name.contains(")|(")
    }

    fn mangled(&self) -> String {
        format!("{}:{}", self.module.replace('.', ":"), self.name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

// =============================================================================
// Tests
// =============================================================================
