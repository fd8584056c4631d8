//! The name → declaration index.
//!
//! Backed by persistent maps so a load can take an O(1) snapshot and roll
//! back to it on failure.

use im::{HashMap, Vector};
use schemalink_foundation::{Error, Name, Result};

use crate::BUILTIN_MODULE;
use crate::kind::PrototypeKind;
use crate::proto::{Atom, Computable, Concept, Link, LinkProperty, Prototype};

/// Declarations by qualified name, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct SchemaIndex {
    items: HashMap<Name, Prototype>,
    order: Vector<Name>,
}

impl SchemaIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is already registered.
    pub fn add(&mut self, proto: impl Into<Prototype>) -> Result<()> {
        let proto = proto.into();
        let name = proto.name().clone();
        if self.items.contains_key(&name) {
            return Err(Error::duplicate_name(&name));
        }
        self.order.push_back(name.clone());
        self.items.insert(name, proto);
        Ok(())
    }

    /// Looks a declaration up by exact name.
    #[must_use]
    pub fn get(&self, name: &Name) -> Option<&Prototype> {
        self.items.get(name)
    }

    /// Mutable lookup by exact name.
    pub fn get_mut(&mut self, name: &Name) -> Option<&mut Prototype> {
        self.items.get_mut(name)
    }

    /// Looks a declaration of a given kind up by exact name.
    #[must_use]
    pub fn get_kind(&self, name: &Name, kind: PrototypeKind) -> Option<&Prototype> {
        self.get(name).filter(|p| p.kind() == kind)
    }

    /// Returns true if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &Name) -> bool {
        self.items.contains_key(name)
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if any declaration lives in `module`.
    #[must_use]
    pub fn has_module(&self, module: &str) -> bool {
        self.order.iter().any(|n| n.module() == module)
    }

    /// Names of declarations of `kind`, in insertion order.
    #[must_use]
    pub fn names(&self, kind: PrototypeKind) -> Vec<Name> {
        self.iterate(Some(kind), true, true)
            .map(|p| p.name().clone())
            .collect()
    }

    /// Lazily iterates declarations in insertion order.
    ///
    /// `kind: None` yields every kind. Builtin and automatic declarations are
    /// skipped unless requested. The iterator is `Clone`, so a walk can be
    /// restarted from any point.
    #[must_use]
    pub fn iterate(
        &self,
        kind: Option<PrototypeKind>,
        include_builtin: bool,
        include_automatic: bool,
    ) -> Iterate<'_> {
        Iterate {
            index: self,
            pos: 0,
            kind,
            include_builtin,
            include_automatic,
        }
    }

    /// Returns true if `child` is `ancestor` or inherits from it.
    #[must_use]
    pub fn is_subclass(&self, child: &Name, ancestor: &Name) -> bool {
        let mut stack = vec![child.clone()];
        let mut seen = std::collections::HashSet::new();
        while let Some(name) = stack.pop() {
            if &name == ancestor {
                return true;
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(p) = self.get(&name) {
                stack.extend(p.bases().iter().cloned());
            }
        }
        false
    }

    /// The atom named `name`.
    #[must_use]
    pub fn atom(&self, name: &Name) -> Option<&Atom> {
        self.get(name).and_then(Prototype::as_atom)
    }

    /// The concept named `name`.
    #[must_use]
    pub fn concept(&self, name: &Name) -> Option<&Concept> {
        self.get(name).and_then(Prototype::as_concept)
    }

    /// The link named `name`.
    #[must_use]
    pub fn link(&self, name: &Name) -> Option<&Link> {
        self.get(name).and_then(Prototype::as_link)
    }

    /// The link property named `name`.
    #[must_use]
    pub fn link_property(&self, name: &Name) -> Option<&LinkProperty> {
        self.get(name).and_then(Prototype::as_link_property)
    }

    /// The computable named `name`.
    #[must_use]
    pub fn computable(&self, name: &Name) -> Option<&Computable> {
        self.get(name).and_then(Prototype::as_computable)
    }

    /// Returns true if `name` is an atom.
    #[must_use]
    pub fn is_atom(&self, name: &Name) -> bool {
        self.atom(name).is_some()
    }
}

/// Lazy, restartable iteration over a [`SchemaIndex`].
#[derive(Clone, Debug)]
pub struct Iterate<'a> {
    index: &'a SchemaIndex,
    pos: usize,
    kind: Option<PrototypeKind>,
    include_builtin: bool,
    include_automatic: bool,
}

impl<'a> Iterator for Iterate<'a> {
    type Item = &'a Prototype;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(name) = self.index.order.get(self.pos) {
            self.pos += 1;
            let Some(proto) = self.index.items.get(name) else {
                continue;
            };
            if self.kind.is_some_and(|k| proto.kind() != k) {
                continue;
            }
            if !self.include_builtin && name.module() == BUILTIN_MODULE {
                continue;
            }
            if !self.include_automatic && proto.is_automatic() {
                continue;
            }
            return Some(proto);
        }
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
