//! Scalar types.

use schemalink_foundation::{Name, Provenance, RawMap};

use crate::constraint::ConstraintSet;
use crate::default::DefaultSpec;

/// Attributes of an atom. `None` means "not set here".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AtomAttrs {
    /// Default values.
    pub default: Option<Vec<DefaultSpec>>,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Abstract atoms cannot hold values. Not inherited.
    pub is_abstract: Option<bool>,
    /// Final atoms cannot be extended. Not inherited.
    pub is_final: Option<bool>,
    /// Free-form attributes.
    pub attributes: Option<RawMap>,
}

impl AtomAttrs {
    /// Fills unset inheritable attributes from `base`.
    pub fn inherit(&mut self, base: &AtomAttrs) {
        fill(&mut self.default, &base.default);
        fill(&mut self.title, &base.title);
        fill(&mut self.description, &base.description);
        fill(&mut self.attributes, &base.attributes);
    }
}

pub(crate) fn fill<T: Clone>(slot: &mut Option<T>, base: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(base);
    }
}

/// A scalar type.
#[derive(Clone, Debug)]
pub struct Atom {
    /// Qualified name.
    pub name: Name,
    /// Base atom.
    pub base: Option<Name>,
    /// Attributes as declared.
    pub own: AtomAttrs,
    /// Attributes after merging with the base.
    pub attrs: AtomAttrs,
    /// Constraints as declared.
    pub own_constraints: ConstraintSet,
    /// Constraints after merging with the base.
    pub constraints: ConstraintSet,
    /// Generated for inline pointer constraints.
    pub automatic: bool,
    /// Where the atom was declared.
    pub provenance: Provenance,
    /// Set once the linearizer has merged this atom.
    pub merged: bool,
}

impl Atom {
    /// Creates an atom with no base and no attributes.
    #[must_use]
    pub fn new(name: Name, provenance: Provenance) -> Self {
        Self {
            name,
            base: None,
            own: AtomAttrs::default(),
            attrs: AtomAttrs::default(),
            own_constraints: ConstraintSet::new(),
            constraints: ConstraintSet::new(),
            automatic: false,
            provenance,
            merged: false,
        }
    }

    /// Sets the base.
    #[must_use]
    pub fn with_base(mut self, base: Name) -> Self {
        self.base = Some(base);
        self
    }

    /// Sets the declared attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: AtomAttrs) -> Self {
        self.own = attrs;
        self
    }

    /// Sets the declared constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.own_constraints = constraints;
        self
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
