//! Links: typed directed edges between a source concept and a target.
//!
//! A link without a source is *generic*: it declares the pointer name, its
//! default attributes and the properties it may carry. Every concrete use of
//! a pointer on a concept is a *specialization* whose single base is the
//! generic link.

use schemalink_foundation::{Name, Provenance};

use super::atom::fill;
use super::{PointerMap, SourceIndex};
use crate::constraint::ConstraintSet;
use crate::default::DefaultSpec;
use crate::mapping::{LinkMapping, LinkSearchConfiguration};

/// Attributes of a link. `None` means "not set here".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkAttrs {
    /// Cardinality.
    pub mapping: Option<LinkMapping>,
    /// Whether a value is required.
    pub required: Option<bool>,
    /// Whether the value is immutable once set.
    pub readonly: Option<bool>,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Default values.
    pub default: Option<Vec<DefaultSpec>>,
    /// Full-text search configuration.
    pub search: Option<LinkSearchConfiguration>,
    /// Abstract links only serve as bases. Not inherited.
    pub is_abstract: Option<bool>,
    /// Final links cannot be extended. Not inherited.
    pub is_final: Option<bool>,
}

impl LinkAttrs {
    /// Fills unset inheritable attributes from `base`.
    pub fn inherit(&mut self, base: &LinkAttrs) {
        fill(&mut self.mapping, &base.mapping);
        fill(&mut self.required, &base.required);
        fill(&mut self.readonly, &base.readonly);
        fill(&mut self.title, &base.title);
        fill(&mut self.description, &base.description);
        fill(&mut self.default, &base.default);
        fill(&mut self.search, &base.search);
    }
}

/// A link.
#[derive(Clone, Debug)]
pub struct Link {
    /// Qualified name.
    pub name: Name,
    /// Bases, in declaration order.
    pub bases: Vec<Name>,
    /// Source concept; `None` for generic links.
    pub source: Option<Name>,
    /// Target atom or concept; `None` for generic links.
    pub target: Option<Name>,
    /// Attributes as declared.
    pub own: LinkAttrs,
    /// Attributes after merging.
    pub attrs: LinkAttrs,
    /// Whether the link points at an atom, once known.
    pub is_atom: Option<bool>,
    /// Properties and computables declared on this link.
    pub own_pointers: PointerMap,
    /// Declared and inherited properties.
    pub pointers: PointerMap,
    /// Enforced constraints as declared.
    pub own_constraints: ConstraintSet,
    /// Enforced constraints after merging.
    pub constraints: ConstraintSet,
    /// Abstract constraints as declared.
    pub own_abstract_constraints: ConstraintSet,
    /// Abstract constraints after merging; descendants enforce these.
    pub abstract_constraints: ConstraintSet,
    /// Indexes declared on this link.
    pub own_indexes: Vec<SourceIndex>,
    /// Declared and inherited indexes.
    pub indexes: Vec<SourceIndex>,
    /// Created on demand for an undeclared pointer name.
    pub implicit: bool,
    /// Where the link was declared.
    pub provenance: Provenance,
    /// Set once the linearizer has merged this link.
    pub merged: bool,
}

impl Link {
    /// Creates a generic link.
    #[must_use]
    pub fn generic(name: Name, provenance: Provenance) -> Self {
        Self {
            name,
            bases: Vec::new(),
            source: None,
            target: None,
            own: LinkAttrs::default(),
            attrs: LinkAttrs::default(),
            is_atom: None,
            own_pointers: PointerMap::new(),
            pointers: PointerMap::new(),
            own_constraints: ConstraintSet::new(),
            constraints: ConstraintSet::new(),
            own_abstract_constraints: ConstraintSet::new(),
            abstract_constraints: ConstraintSet::new(),
            own_indexes: Vec::new(),
            indexes: Vec::new(),
            implicit: false,
            provenance,
            merged: false,
        }
    }

    /// Creates the specialization of `pointer` from `source` to `target`.
    #[must_use]
    pub fn specialization(
        source: &Name,
        pointer: &Name,
        target: &Name,
        provenance: Provenance,
    ) -> Self {
        let mut link = Self::generic(Name::specialized(source, pointer, Some(target)), provenance);
        link.bases = vec![pointer.clone()];
        link.source = Some(source.clone());
        link.target = Some(target.clone());
        link
    }

    /// Sets the bases.
    #[must_use]
    pub fn with_bases(mut self, bases: Vec<Name>) -> Self {
        self.bases = bases;
        self
    }

    /// Sets the declared attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: LinkAttrs) -> Self {
        self.own = attrs;
        self
    }

    /// Returns true for links without a source.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.source.is_none()
    }

    /// The generic pointer this link specializes, or its own name.
    #[must_use]
    pub fn normal_name(&self) -> &Name {
        match (&self.source, self.bases.first()) {
            (Some(_), Some(base)) => base,
            _ => &self.name,
        }
    }

    /// Returns true if the link points at an atom.
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.is_atom.unwrap_or(false)
    }

    /// Effective mapping: declared or inherited, else `11` for atomic links
    /// and `*1` otherwise.
    #[must_use]
    pub fn mapping(&self) -> LinkMapping {
        self.attrs.mapping.unwrap_or(if self.is_atomic() {
            LinkMapping::OneToOne
        } else {
            LinkMapping::ManyToOne
        })
    }

    /// Returns true if a value is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.attrs.required.unwrap_or(false)
    }

    /// Returns true if the value is immutable.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.attrs.readonly.unwrap_or(false)
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

    /// Records a property or computable under its generic name.
    pub fn add_pointer(&mut self, pointer: Name, declaration: Name) {
        let decls = self.own_pointers.entry(pointer).or_default();
        if !decls.contains(&declaration) {
            decls.push(declaration);
        }
    }
}
