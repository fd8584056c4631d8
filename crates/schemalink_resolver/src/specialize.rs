//! Pointer specialization and constraint legality.
//!
//! A concrete use of a generic pointer becomes a declaration of its own,
//! named after `(source, pointer, target)` and based on the generic pointer.
//! Specializing the same triple twice yields the same declaration.

use schemalink_foundation::{Error, Name, Provenance, RawValue, Result};
use schemalink_schema::{
    Atom, Constraint, ConstraintSet, Link, LinkProperty, Prototype, PrototypeKind,
};
use tracing::trace;

use crate::builtins;
use crate::intake::{RawLinkUse, RawPropertyUse};
use crate::linker::Linker;

/// Adds `constraint` to `set`, checking where it may be used.
///
/// `atomic` is whether the owning pointer targets an atom, if known. A
/// `unique` constraint takes a single non-string value on an atomic pointer
/// and a single expression string on a non-atomic one.
pub(crate) fn add_constraint(
    set: &mut ConstraintSet,
    constraint: Constraint,
    atomic: Option<bool>,
) -> Result<()> {
    if let Constraint::Unique(value) = &constraint {
        match (atomic, value) {
            (_, RawValue::Null | RawValue::List(_) | RawValue::Map(_)) => {
                return Err(Error::invalid_constraint(format!(
                    "`unique` takes a single value, got {value}"
                )));
            }
            (Some(true), RawValue::Str(_)) => {
                return Err(Error::invalid_constraint(
                    "`unique` on an atomic pointer takes a single non-string value",
                ));
            }
            (Some(false), v) if v.as_str().is_none() => {
                return Err(Error::invalid_constraint(
                    "`unique` on a non-atomic pointer takes an expression",
                ));
            }
            _ => {}
        }
    }
    set.add(constraint);
    Ok(())
}

/// Adds an abstract constraint. Descendants enforce it, so it follows the
/// same rules as [`add_constraint`].
pub(crate) fn add_abstract_constraint(
    set: &mut ConstraintSet,
    constraint: Constraint,
    atomic: Option<bool>,
) -> Result<()> {
    add_constraint(set, constraint, atomic)
}

impl Linker<'_> {
    /// Registers a specialization unless one with the same name exists.
    pub(crate) fn specialize(&mut self, proto: impl Into<Prototype>) -> Result<Name> {
        let proto = proto.into();
        let name = proto.name().clone();
        if self.index.contains(&name) {
            return Ok(name);
        }
        trace!(specialization = %name, "specialized pointer");
        self.register(proto)
    }

    /// Resolves a generic link, creating a builtin-rooted one for an
    /// undeclared local name.
    pub(crate) fn ensure_generic_link(
        &mut self,
        name: &str,
        is_atom: Option<bool>,
        provenance: &Provenance,
    ) -> Result<Name> {
        if let Some(found) = self.ns.resolve_opt(self.index, name, &[PrototypeKind::Link]) {
            return Ok(found);
        }
        if Name::is_qualified(name) {
            return Err(Error::unresolved_name(name));
        }
        let mut link = Link::generic(self.ns.qualify(name), provenance.clone())
            .with_bases(vec![builtins::root_link()]);
        link.is_atom = is_atom;
        link.implicit = true;
        trace!(link = %link.name, "created generic link");
        self.register(link)
    }

    /// Resolves a generic link property, creating a builtin-rooted one for
    /// an undeclared local name.
    pub(crate) fn ensure_generic_property(&mut self, name: &str, provenance: &Provenance) -> Result<Name> {
        if let Some(found) = self
            .ns
            .resolve_opt(self.index, name, &[PrototypeKind::LinkProperty])
        {
            return Ok(found);
        }
        if Name::is_qualified(name) {
            return Err(Error::unresolved_name(name));
        }
        let mut prop = LinkProperty::generic(self.ns.qualify(name), provenance.clone())
            .with_bases(vec![builtins::root_property()]);
        prop.implicit = true;
        trace!(property = %prop.name, "created generic link property");
        self.register(prop)
    }

    /// Returns true if `link` or one of its bases declares `property`.
    fn defines_property(&self, link: &Name, property: &Name) -> bool {
        let mut stack = vec![link.clone()];
        while let Some(name) = stack.pop() {
            if let Some(l) = self.index.link(&name) {
                if l.own_pointers.contains_key(property) || l.pointers.contains_key(property) {
                    return true;
                }
                stack.extend(l.bases.iter().cloned());
            }
        }
        false
    }

    /// Generates the automatic atom carrying inline atom constraints for
    /// `pointer` on `host`. Fails with `DuplicateName` if the generated
    /// name is taken.
    fn genatom(
        &mut self,
        host: &Name,
        pointer: &Name,
        base: &Name,
        constraints: Vec<Constraint>,
        provenance: &Provenance,
    ) -> Result<Name> {
        let name = Name::generated(host, pointer.name());
        let mut atom = Atom::new(name, provenance.clone())
            .with_base(base.clone())
            .with_constraints(constraints.into_iter().collect());
        atom.automatic = true;
        trace!(atom = %atom.name, base = %base, "generated automatic atom");
        self.register(atom)
    }

    /// Specializes a link used on `concept`.
    pub(crate) fn link_use(&mut self, concept: &Name, raw: RawLinkUse) -> Result<Name> {
        let declared = self.ns.resolve(
            self.index,
            &raw.target,
            &[PrototypeKind::Atom, PrototypeKind::Concept],
        )?;
        let is_atom = self.index.is_atom(&declared);
        let pointer = self.ensure_generic_link(&raw.name, Some(is_atom), &raw.provenance)?;

        let (atom_constraints, pointer_constraints): (Vec<_>, Vec<_>) = raw
            .constraints
            .into_iter()
            .partition(Constraint::is_atom_constraint);
        if !is_atom && !atom_constraints.is_empty() {
            return Err(Error::invalid_constraint(format!(
                "atom constraints on link to concept {declared}"
            )));
        }
        let target = if atom_constraints.is_empty() {
            declared
        } else {
            self.genatom(concept, &pointer, &declared, atom_constraints, &raw.provenance)?
        };

        let mut link = Link::specialization(concept, &pointer, &target, raw.provenance.clone())
            .with_attrs(raw.attrs);
        link.is_atom = Some(is_atom);
        for c in pointer_constraints {
            add_constraint(&mut link.own_constraints, c, Some(is_atom))?;
        }
        for c in raw.abstract_constraints {
            add_abstract_constraint(&mut link.own_abstract_constraints, c, Some(is_atom))?;
        }
        let name = self.specialize(link)?;

        for prop in raw.properties {
            self.property_use(&name, Some(&pointer), prop)?;
        }
        self.add_pointer(concept, pointer, name.clone());
        Ok(name)
    }

    /// Specializes a property used on `link`.
    ///
    /// `generic` is the generic link `link` specializes, or `None` when
    /// `link` is itself generic. Only generic links may introduce property
    /// names; a specialized link uses the properties its generic link
    /// declares.
    pub(crate) fn property_use(
        &mut self,
        link: &Name,
        generic: Option<&Name>,
        raw: RawPropertyUse,
    ) -> Result<Name> {
        let pointer = match generic {
            None => self.ensure_generic_property(&raw.name, &raw.provenance)?,
            Some(generic) => {
                let pointer = self
                    .ns
                    .resolve(self.index, &raw.name, &[PrototypeKind::LinkProperty])?;
                if !self.defines_property(generic, &pointer) {
                    return Err(Error::unresolved_name(format!(
                        "{pointer} is not a property of {generic}"
                    )));
                }
                pointer
            }
        };
        let declared = self
            .ns
            .resolve(self.index, &raw.target, &[PrototypeKind::Atom])?;

        let (atom_constraints, pointer_constraints): (Vec<_>, Vec<_>) = raw
            .constraints
            .into_iter()
            .partition(Constraint::is_atom_constraint);
        let target = if atom_constraints.is_empty() {
            declared
        } else {
            self.genatom(link, &pointer, &declared, atom_constraints, &raw.provenance)?
        };

        let mut prop = LinkProperty::specialization(link, &pointer, &target, raw.provenance.clone())
            .with_attrs(raw.attrs);
        for c in pointer_constraints {
            add_constraint(&mut prop.own_constraints, c, Some(true))?;
        }
        for c in raw.abstract_constraints {
            add_abstract_constraint(&mut prop.own_abstract_constraints, c, Some(true))?;
        }
        let name = self.specialize(prop)?;
        self.add_pointer(link, pointer, name.clone());
        Ok(name)
    }
}

// =============================================================================
// Tests
// =============================================================================
