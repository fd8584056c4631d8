//! The materialized schema.

use schemalink_foundation::{Error, Name, Result};

use crate::BUILTIN_MODULE;
use crate::index::{Iterate, SchemaIndex};
use crate::kind::PrototypeKind;
use crate::proto::{Atom, Computable, Concept, Link, LinkProperty, Prototype};

/// A fully linked, read-only schema.
///
/// Every reference held by a declaration in the schema resolves to a
/// declaration in the same schema. Builtin declarations are present but
/// hidden from lookups unless requested.
#[derive(Clone, Debug)]
pub struct Schema {
    index: SchemaIndex,
    main_module: Option<String>,
    include_builtin: bool,
}

impl Schema {
    /// Wraps a validated index.
    #[must_use]
    pub fn new(index: SchemaIndex, main_module: Option<String>, include_builtin: bool) -> Self {
        Self {
            index,
            main_module,
            include_builtin,
        }
    }

    /// The underlying index, builtins included.
    #[must_use]
    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    /// The module this schema was loaded for.
    #[must_use]
    pub fn main_module(&self) -> Option<&str> {
        self.main_module.as_deref()
    }

    /// Returns true if builtins are visible by default.
    #[must_use]
    pub fn includes_builtin(&self) -> bool {
        self.include_builtin
    }

    fn candidates(&self, name: &str) -> Vec<Name> {
        if let Some(qualified) = Name::parse(name) {
            return vec![qualified];
        }
        let mut out = Vec::new();
        if let Some(main) = &self.main_module {
            out.push(Name::new(main.clone(), name));
        }
        out.push(Name::new(BUILTIN_MODULE, name));
        out
    }

    fn visible(&self, name: &Name, include_builtin: bool) -> bool {
        include_builtin || self.include_builtin || name.module() != BUILTIN_MODULE
    }

    /// Looks up a declaration by qualified name, or by local name in the
    /// main module and then the builtin module.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if no visible declaration of `kind` matches.
    pub fn get(
        &self,
        name: &str,
        kind: Option<PrototypeKind>,
        include_builtin: bool,
    ) -> Result<&Prototype> {
        self.get_opt(name, kind, include_builtin)
            .ok_or_else(|| Error::unresolved_name(name))
    }

    /// Like [`Schema::get`], returning `None` instead of an error.
    #[must_use]
    pub fn get_opt(
        &self,
        name: &str,
        kind: Option<PrototypeKind>,
        include_builtin: bool,
    ) -> Option<&Prototype> {
        self.candidates(name)
            .into_iter()
            .filter(|n| self.visible(n, include_builtin))
            .find_map(|n| {
                self.index
                    .get(&n)
                    .filter(|p| kind.is_none_or(|k| p.kind() == k))
            })
    }

    /// Iterates declarations in insertion order.
    #[must_use]
    pub fn iterate(
        &self,
        kind: Option<PrototypeKind>,
        include_builtin: bool,
        include_automatic: bool,
    ) -> Iterate<'_> {
        self.index.iterate(
            kind,
            include_builtin || self.include_builtin,
            include_automatic,
        )
    }

    /// Number of visible, non-automatic declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iterate(None, false, false).count()
    }

    /// Returns true if nothing visible is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        kind: PrototypeKind,
        cast: impl FnOnce(&'a Prototype) -> Option<&'a T>,
    ) -> Result<&'a T> {
        self.get(name, Some(kind), false).and_then(|p| {
            cast(p).ok_or_else(|| Error::internal(format!("{name} is not a {kind}")))
        })
    }

    /// Looks up an atom.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if there is no such atom.
    pub fn atom(&self, name: &str) -> Result<&Atom> {
        self.typed(name, PrototypeKind::Atom, Prototype::as_atom)
    }

    /// Looks up a concept.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if there is no such concept.
    pub fn concept(&self, name: &str) -> Result<&Concept> {
        self.typed(name, PrototypeKind::Concept, Prototype::as_concept)
    }

    /// Looks up a link.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if there is no such link.
    pub fn link(&self, name: &str) -> Result<&Link> {
        self.typed(name, PrototypeKind::Link, Prototype::as_link)
    }

    /// Looks up a link property.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if there is no such link property.
    pub fn link_property(&self, name: &str) -> Result<&LinkProperty> {
        self.typed(name, PrototypeKind::LinkProperty, Prototype::as_link_property)
    }

    /// Looks up a computable.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if there is no such computable.
    pub fn computable(&self, name: &str) -> Result<&Computable> {
        self.typed(name, PrototypeKind::Computable, Prototype::as_computable)
    }

    /// Every declaration of a concept's pointer, one per target.
    ///
    /// `pointer` may be qualified, or a local name; local names prefer the
    /// concept's own module.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if the concept or pointer does not exist.
    pub fn pointer_set(&self, concept: &str, pointer: &str) -> Result<Vec<&Prototype>> {
        let c = self.concept(concept)?;
        let key = match Name::parse(pointer) {
            Some(q) => c.pointers.get_key_value(&q).map(|(k, _)| k),
            None => c
                .pointers
                .keys()
                .filter(|k| k.name() == pointer)
                .min_by_key(|k| k.module() != c.name.module()),
        }
        .ok_or_else(|| Error::unresolved_name(format!("{}.{pointer}", c.name)))?;

        c.pointers[key]
            .iter()
            .map(|decl| {
                self.index
                    .get(decl)
                    .ok_or_else(|| Error::unresolved_name(decl))
            })
            .collect()
    }

    /// The first declaration of a concept's pointer.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` if the concept or pointer does not exist.
    pub fn pointer(&self, concept: &str, pointer: &str) -> Result<&Prototype> {
        self.pointer_set(concept, pointer)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::unresolved_name(format!("{concept}.{pointer}")))
    }

    /// Returns true if `child` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_subclass(&self, child: &Name, ancestor: &Name) -> bool {
        self.index.is_subclass(child, ancestor)
    }
}
