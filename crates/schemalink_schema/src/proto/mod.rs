//! Schema declarations ("prototypes").
//!
//! Each kind keeps what was declared (`own*` fields) apart from what it ends
//! up with after inheritance (the unprefixed fields). The linearizer fills
//! the latter; `represent` reads the former.

mod atom;
mod computable;
mod concept;
mod link;
mod property;

use indexmap::IndexMap;
use schemalink_foundation::{Name, Provenance};

pub use atom::{Atom, AtomAttrs};
pub use computable::Computable;
pub use concept::{Concept, ConceptAttrs};
pub use link::{Link, LinkAttrs};
pub use property::{LinkProperty, PropertyAttrs};

use crate::kind::PrototypeKind;

/// Pointers of a source: generic pointer name → declarations.
///
/// A concept link may have several declarations, one per target. A
/// computable always has exactly one.
pub type PointerMap = IndexMap<Name, Vec<Name>>;

// =============================================================================
// SourceIndex
// =============================================================================

/// An index over an expression on a concept or link.
#[derive(Clone, Debug)]
pub struct SourceIndex {
    /// The expression as written.
    pub expr: String,
    /// Canonical text, once type-checked.
    pub resolved: Option<String>,
    /// Where the index was declared.
    pub provenance: Provenance,
}

impl SourceIndex {
    /// Creates an unresolved index.
    #[must_use]
    pub fn new(expr: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            expr: expr.into(),
            resolved: None,
            provenance,
        }
    }
}

impl PartialEq for SourceIndex {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

// =============================================================================
// Prototype
// =============================================================================

/// Any schema declaration.
#[derive(Clone, Debug)]
pub enum Prototype {
    /// Scalar type.
    Atom(Atom),
    /// Object type.
    Concept(Concept),
    /// Link.
    Link(Link),
    /// Link property.
    LinkProperty(LinkProperty),
    /// Computable.
    Computable(Computable),
}

impl Prototype {
    /// The kind of this declaration.
    #[must_use]
    pub fn kind(&self) -> PrototypeKind {
        match self {
            Self::Atom(_) => PrototypeKind::Atom,
            Self::Concept(_) => PrototypeKind::Concept,
            Self::Link(_) => PrototypeKind::Link,
            Self::LinkProperty(_) => PrototypeKind::LinkProperty,
            Self::Computable(_) => PrototypeKind::Computable,
        }
    }

    /// Qualified name.
    #[must_use]
    pub fn name(&self) -> &Name {
        match self {
            Self::Atom(p) => &p.name,
            Self::Concept(p) => &p.name,
            Self::Link(p) => &p.name,
            Self::LinkProperty(p) => &p.name,
            Self::Computable(p) => &p.name,
        }
    }

    /// Bases, in declaration order.
    #[must_use]
    pub fn bases(&self) -> &[Name] {
        match self {
            Self::Atom(p) => p.base.as_slice(),
            Self::Concept(p) => &p.bases,
            Self::Link(p) => &p.bases,
            Self::LinkProperty(p) => &p.bases,
            Self::Computable(p) => &p.bases,
        }
    }

    /// Where the declaration came from.
    #[must_use]
    pub fn provenance(&self) -> &Provenance {
        match self {
            Self::Atom(p) => &p.provenance,
            Self::Concept(p) => &p.provenance,
            Self::Link(p) => &p.provenance,
            Self::LinkProperty(p) => &p.provenance,
            Self::Computable(p) => &p.provenance,
        }
    }

    /// Returns true for engine-generated atoms.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::Atom(a) if a.automatic)
    }

    /// Returns true if this declaration is final.
    #[must_use]
    pub fn is_final(&self) -> bool {
        match self {
            Self::Atom(p) => p.is_final(),
            Self::Concept(p) => p.is_final(),
            Self::Link(p) => p.is_final(),
            Self::LinkProperty(_) | Self::Computable(_) => false,
        }
    }

    /// Short description used in error frames, e.g. `concept app.Person`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind(), self.name())
    }

    /// Returns the atom, if this is one.
    #[must_use]
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the concept, if this is one.
    #[must_use]
    pub fn as_concept(&self) -> Option<&Concept> {
        match self {
            Self::Concept(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the link, if this is one.
    #[must_use]
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Self::Link(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the link property, if this is one.
    #[must_use]
    pub fn as_link_property(&self) -> Option<&LinkProperty> {
        match self {
            Self::LinkProperty(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the computable, if this is one.
    #[must_use]
    pub fn as_computable(&self) -> Option<&Computable> {
        match self {
            Self::Computable(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable access to the atom, if this is one.
    pub fn as_atom_mut(&mut self) -> Option<&mut Atom> {
        match self {
            Self::Atom(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable access to the concept, if this is one.
    pub fn as_concept_mut(&mut self) -> Option<&mut Concept> {
        match self {
            Self::Concept(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable access to the link, if this is one.
    pub fn as_link_mut(&mut self) -> Option<&mut Link> {
        match self {
            Self::Link(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable access to the link property, if this is one.
    pub fn as_link_property_mut(&mut self) -> Option<&mut LinkProperty> {
        match self {
            Self::LinkProperty(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable access to the computable, if this is one.
    pub fn as_computable_mut(&mut self) -> Option<&mut Computable> {
        match self {
            Self::Computable(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Atom> for Prototype {
    fn from(p: Atom) -> Self {
        Self::Atom(p)
    }
}

impl From<Concept> for Prototype {
    fn from(p: Concept) -> Self {
        Self::Concept(p)
    }
}

impl From<Link> for Prototype {
    fn from(p: Link) -> Self {
        Self::Link(p)
    }
}

impl From<LinkProperty> for Prototype {
    fn from(p: LinkProperty) -> Self {
        Self::LinkProperty(p)
    }
}

impl From<Computable> for Prototype {
    fn from(p: Computable) -> Self {
        Self::Computable(p)
    }
}
