//! Object types.

use schemalink_foundation::{Name, Provenance};

use super::atom::fill;
use super::{PointerMap, SourceIndex};

/// Attributes of a concept. `None` means "not set here".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConceptAttrs {
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Abstract concepts cannot be instantiated. Not inherited.
    pub is_abstract: Option<bool>,
    /// Final concepts cannot be extended. Not inherited.
    pub is_final: Option<bool>,
}

impl ConceptAttrs {
    /// Fills unset inheritable attributes from `base`.
    pub fn inherit(&mut self, base: &ConceptAttrs) {
        fill(&mut self.title, &base.title);
        fill(&mut self.description, &base.description);
    }
}

/// An object type.
#[derive(Clone, Debug)]
pub struct Concept {
    /// Qualified name.
    pub name: Name,
    /// Bases, in declaration order.
    pub bases: Vec<Name>,
    /// Attributes as declared.
    pub own: ConceptAttrs,
    /// Attributes after merging.
    pub attrs: ConceptAttrs,
    /// Pointers declared on this concept.
    pub own_pointers: PointerMap,
    /// Declared and inherited pointers.
    pub pointers: PointerMap,
    /// Indexes declared on this concept.
    pub own_indexes: Vec<SourceIndex>,
    /// Declared and inherited indexes.
    pub indexes: Vec<SourceIndex>,
    /// Where the concept was declared.
    pub provenance: Provenance,
    /// Set once the linearizer has merged this concept.
    pub merged: bool,
}

impl Concept {
    /// Creates a concept with no bases.
    #[must_use]
    pub fn new(name: Name, provenance: Provenance) -> Self {
        Self {
            name,
            bases: Vec::new(),
            own: ConceptAttrs::default(),
            attrs: ConceptAttrs::default(),
            own_pointers: PointerMap::new(),
            pointers: PointerMap::new(),
            own_indexes: Vec::new(),
            indexes: Vec::new(),
            provenance,
            merged: false,
        }
    }

    /// Sets the declared attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: ConceptAttrs) -> Self {
        self.own = attrs;
        self
    }

    /// Records a pointer declaration under its generic name.
    pub fn add_pointer(&mut self, pointer: Name, declaration: Name) {
        let decls = self.own_pointers.entry(pointer).or_default();
        if !decls.contains(&declaration) {
            decls.push(declaration);
        }
    }

    /// Returns true if abstract.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.attrs.is_abstract.or(self.own.is_abstract).unwrap_or(false)
    }

    /// Returns true if final.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.attrs.is_final.or(self.own.is_final).unwrap_or(false)
    }
}
