//! Link properties.

use schemalink_foundation::{Name, Provenance};

use super::atom::fill;
use crate::constraint::ConstraintSet;
use crate::default::DefaultSpec;

/// Attributes of a link property. `None` means "not set here".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyAttrs {
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Whether the value is immutable once set.
    pub readonly: Option<bool>,
    /// Default values.
    pub default: Option<Vec<DefaultSpec>>,
}

impl PropertyAttrs {
    /// Fills unset attributes from `base`.
    pub fn inherit(&mut self, base: &PropertyAttrs) {
        fill(&mut self.title, &base.title);
        fill(&mut self.description, &base.description);
        fill(&mut self.readonly, &base.readonly);
        fill(&mut self.default, &base.default);
    }
}

/// A scalar attribute of a link.
#[derive(Clone, Debug)]
pub struct LinkProperty {
    /// Qualified name.
    pub name: Name,
    /// Bases, in declaration order.
    pub bases: Vec<Name>,
    /// Owning link; `None` for generic properties.
    pub source: Option<Name>,
    /// Target atom; `None` for generic properties.
    pub target: Option<Name>,
    /// Attributes as declared.
    pub own: PropertyAttrs,
    /// Attributes after merging.
    pub attrs: PropertyAttrs,
    /// Enforced constraints as declared.
    pub own_constraints: ConstraintSet,
    /// Enforced constraints after merging.
    pub constraints: ConstraintSet,
    /// Abstract constraints as declared.
    pub own_abstract_constraints: ConstraintSet,
    /// Abstract constraints after merging.
    pub abstract_constraints: ConstraintSet,
    /// Created on demand for an undeclared pointer name.
    pub implicit: bool,
    /// Where the property was declared.
    pub provenance: Provenance,
    /// Set once the linearizer has merged this property.
    pub merged: bool,
}

impl LinkProperty {
    /// Creates a generic link property.
    #[must_use]
    pub fn generic(name: Name, provenance: Provenance) -> Self {
        Self {
            name,
            bases: Vec::new(),
            source: None,
            target: None,
            own: PropertyAttrs::default(),
            attrs: PropertyAttrs::default(),
            own_constraints: ConstraintSet::new(),
            constraints: ConstraintSet::new(),
            own_abstract_constraints: ConstraintSet::new(),
            abstract_constraints: ConstraintSet::new(),
            implicit: false,
            provenance,
            merged: false,
        }
    }

    /// Creates the specialization of `pointer` on `link` targeting `target`.
    #[must_use]
    pub fn specialization(link: &Name, pointer: &Name, target: &Name, provenance: Provenance) -> Self {
        let mut prop = Self::generic(Name::specialized(link, pointer, Some(target)), provenance);
        prop.bases = vec![pointer.clone()];
        prop.source = Some(link.clone());
        prop.target = Some(target.clone());
        prop
    }

    /// Sets the bases.
    #[must_use]
    pub fn with_bases(mut self, bases: Vec<Name>) -> Self {
        self.bases = bases;
        self
    }

    /// Sets the declared attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: PropertyAttrs) -> Self {
        self.own = attrs;
        self
    }

    /// Returns true for properties without a source.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.source.is_none()
    }

    /// The generic property this one specializes, or its own name.
    #[must_use]
    pub fn normal_name(&self) -> &Name {
        match (&self.source, self.bases.first()) {
            (Some(_), Some(base)) => base,
            _ => &self.name,
        }
    }

    /// Returns true if the value is immutable.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.attrs.readonly.unwrap_or(false)
    }
}
