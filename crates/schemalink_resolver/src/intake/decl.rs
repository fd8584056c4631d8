//! Raw, unlinked declarations.
//!
//! These carry names exactly as written. Nothing here has been resolved
//! against a namespace; the linker turns them into prototypes.

use schemalink_foundation::Provenance;
use schemalink_schema::{AtomAttrs, ConceptAttrs, Constraint, LinkAttrs, PropertyAttrs};

/// Every declaration of one module, in document order.
#[derive(Clone, Debug, Default)]
pub struct RawModule {
    /// `atoms` section.
    pub atoms: Vec<RawAtom>,
    /// `link-properties` section.
    pub link_properties: Vec<RawLinkProperty>,
    /// `links` section.
    pub links: Vec<RawLink>,
    /// `concepts` section.
    pub concepts: Vec<RawConcept>,
}

impl RawModule {
    /// Total number of top-level declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len() + self.link_properties.len() + self.links.len() + self.concepts.len()
    }

    /// Returns true if the module declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An atom declaration.
#[derive(Clone, Debug)]
pub struct RawAtom {
    /// Local name.
    pub name: String,
    /// Base as written.
    pub extends: Option<String>,
    /// Declared attributes.
    pub attrs: AtomAttrs,
    /// Declared constraints.
    pub constraints: Vec<Constraint>,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// A generic link property declaration.
#[derive(Clone, Debug)]
pub struct RawLinkProperty {
    /// Local name.
    pub name: String,
    /// Bases as written.
    pub extends: Vec<String>,
    /// Declared attributes.
    pub attrs: PropertyAttrs,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// A property used on a link, with its target atom.
#[derive(Clone, Debug)]
pub struct RawPropertyUse {
    /// Property name as written.
    pub name: String,
    /// Target atom as written.
    pub target: String,
    /// Declared attributes.
    pub attrs: PropertyAttrs,
    /// Inline constraints.
    pub constraints: Vec<Constraint>,
    /// Inline abstract constraints.
    pub abstract_constraints: Vec<Constraint>,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// A computable declaration.
#[derive(Clone, Debug)]
pub struct RawComputable {
    /// Pointer name as written.
    pub name: String,
    /// Expression text.
    pub expression: String,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// An index expression.
#[derive(Clone, Debug)]
pub struct RawIndex {
    /// Expression text.
    pub expr: String,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// A generic link declaration.
#[derive(Clone, Debug)]
pub struct RawLink {
    /// Local name.
    pub name: String,
    /// Bases as written.
    pub extends: Vec<String>,
    /// Declared attributes.
    pub attrs: LinkAttrs,
    /// Properties.
    pub properties: Vec<RawPropertyUse>,
    /// Computables.
    pub computables: Vec<RawComputable>,
    /// Indexes.
    pub indexes: Vec<RawIndex>,
    /// Enforced constraints.
    pub constraints: Vec<Constraint>,
    /// Abstract constraints.
    pub abstract_constraints: Vec<Constraint>,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// A link used on a concept, for one target.
#[derive(Clone, Debug)]
pub struct RawLinkUse {
    /// Pointer name as written.
    pub name: String,
    /// Target as written.
    pub target: String,
    /// Declared attributes.
    pub attrs: LinkAttrs,
    /// Properties.
    pub properties: Vec<RawPropertyUse>,
    /// Inline constraints.
    pub constraints: Vec<Constraint>,
    /// Inline abstract constraints.
    pub abstract_constraints: Vec<Constraint>,
    /// Where it was declared.
    pub provenance: Provenance,
}

/// A concept declaration.
#[derive(Clone, Debug)]
pub struct RawConcept {
    /// Local name.
    pub name: String,
    /// Bases as written.
    pub extends: Vec<String>,
    /// Declared attributes.
    pub attrs: ConceptAttrs,
    /// Link uses, one per (pointer, target).
    pub links: Vec<RawLinkUse>,
    /// Computables.
    pub computables: Vec<RawComputable>,
    /// Indexes.
    pub indexes: Vec<RawIndex>,
    /// Where it was declared.
    pub provenance: Provenance,
}
