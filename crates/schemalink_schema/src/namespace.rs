//! Module-scoped name resolution.
//!
//! A [`Namespace`] is the view of the schema from inside one module: its own
//! declarations, the modules it imports under aliases, and the builtin
//! module. Unqualified names are tried against each active module in that
//! order; `alias.X` expands to the aliased module.

use indexmap::IndexMap;
use schemalink_foundation::{Error, Name, Result};

use crate::BUILTIN_MODULE;
use crate::index::SchemaIndex;
use crate::kind::PrototypeKind;
use crate::proto::Prototype;

/// Name resolution context for one module.
#[derive(Clone, Debug)]
pub struct Namespace {
    /// The module being processed.
    pub current: String,
    /// Import aliases: `alias` → module.
    pub aliases: IndexMap<String, String>,
    /// The builtin module, tried last.
    pub builtin: Option<String>,
    /// Declarations registered by the current load, in order.
    declared: Vec<Name>,
}

impl Namespace {
    /// Creates a namespace for `current` that falls back to the builtin module.
    #[must_use]
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            aliases: IndexMap::new(),
            builtin: Some(BUILTIN_MODULE.to_string()),
            declared: Vec::new(),
        }
    }

    /// Disables the builtin fallback.
    #[must_use]
    pub fn without_builtin(mut self) -> Self {
        self.builtin = None;
        self
    }

    /// Adds an import alias.
    #[must_use]
    pub fn with_alias(mut self, alias: &str, module: &str) -> Self {
        self.add_alias(alias, module);
        self
    }

    /// Adds an import alias.
    pub fn add_alias(&mut self, alias: &str, module: &str) {
        self.aliases.insert(alias.to_string(), module.to_string());
    }

    /// Expands `alias.symbol` to the aliased module.
    #[must_use]
    pub fn resolve_alias(&self, alias: &str, symbol: &str) -> Option<Name> {
        self.aliases.get(alias).map(|m| Name::new(m.clone(), symbol))
    }

    /// Qualifies a local name to the current module.
    #[must_use]
    pub fn qualify(&self, symbol: &str) -> Name {
        Name::new(self.current.clone(), symbol)
    }

    /// Active modules, in resolution order.
    #[must_use]
    pub fn modules(&self) -> Vec<&str> {
        let mut out: Vec<&str> = vec![self.current.as_str()];
        for module in self.aliases.values() {
            if !out.contains(&module.as_str()) {
                out.push(module);
            }
        }
        if let Some(builtin) = &self.builtin {
            if !out.contains(&builtin.as_str()) {
                out.push(builtin);
            }
        }
        out
    }

    /// Candidate qualified names for `name`, in resolution order.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<Name> {
        match Name::parse(name) {
            Some(qualified) => {
                let mut out = vec![qualified.clone()];
                if let Some(expanded) = self.resolve_alias(qualified.module(), qualified.name()) {
                    if expanded != qualified {
                        out.push(expanded);
                    }
                }
                out
            }
            None => self
                .modules()
                .into_iter()
                .map(|m| Name::new(m, name))
                .collect(),
        }
    }

    /// Resolves `name` to the first registered declaration of one of `kinds`
    /// (any kind if `kinds` is empty).
    #[must_use]
    pub fn resolve_opt(&self, index: &SchemaIndex, name: &str, kinds: &[PrototypeKind]) -> Option<Name> {
        self.candidates(name).into_iter().find(|candidate| {
            index
                .get(candidate)
                .is_some_and(|p| kinds.is_empty() || kinds.contains(&p.kind()))
        })
    }

    /// Resolves `name` like [`Namespace::resolve_opt`].
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if no active module declares it.
    pub fn resolve(&self, index: &SchemaIndex, name: &str, kinds: &[PrototypeKind]) -> Result<Name> {
        self.resolve_opt(index, name, kinds)
            .ok_or_else(|| Error::unresolved_name(name))
    }

    /// Resolves and fetches a declaration.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if no active module declares it.
    pub fn get<'a>(
        &self,
        index: &'a SchemaIndex,
        name: &str,
        kinds: &[PrototypeKind],
    ) -> Result<&'a Prototype> {
        let qualified = self.resolve(index, name, kinds)?;
        index
            .get(&qualified)
            .ok_or_else(|| Error::unresolved_name(name))
    }

    /// Records a declaration registered by the current load.
    pub fn record(&mut self, name: Name) {
        self.declared.push(name);
    }

    /// Declarations of `kind` registered by the current load.
    #[must_use]
    pub fn declared(&self, index: &SchemaIndex, kind: PrototypeKind) -> Vec<Name> {
        self.declared
            .iter()
            .filter(|n| index.get_kind(n, kind).is_some())
            .cloned()
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
