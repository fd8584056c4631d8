//! The read phase: registers one module's declarations and links names.
//!
//! Every declaration is registered before any name is resolved, so
//! declarations may refer to each other in any order within a module.
//! Bases resolve against the module's namespace, link uses are specialized,
//! and expressions are stored for the ordering phase.

use schemalink_foundation::{Error, Name, Result, ResultExt};
use schemalink_schema::{
    Atom, Computable, Concept, ConstraintSet, Link, LinkProperty, Namespace, Prototype,
    PrototypeKind, SchemaIndex, SourceIndex,
};
use tracing::debug;

use crate::builtins;
use crate::intake::{RawAtom, RawComputable, RawConcept, RawIndex, RawLink, RawLinkProperty, RawModule};
use crate::specialize::{add_abstract_constraint, add_constraint};

/// Mutable view of the global index from inside one module.
pub(crate) struct Linker<'a> {
    pub(crate) index: &'a mut SchemaIndex,
    pub(crate) ns: &'a mut Namespace,
}

impl<'a> Linker<'a> {
    pub(crate) fn new(index: &'a mut SchemaIndex, ns: &'a mut Namespace) -> Self {
        Self { index, ns }
    }

    /// Adds a declaration to the index and records it for this load.
    pub(crate) fn register(&mut self, proto: impl Into<Prototype>) -> Result<Name> {
        let proto = proto.into();
        let name = proto.name().clone();
        self.index.add(proto)?;
        self.ns.record(name.clone());
        Ok(name)
    }

    fn resolve_base(&self, name: &Name, base: &str, kind: PrototypeKind) -> Result<Name> {
        self.ns
            .resolve_opt(self.index, base, &[kind])
            .ok_or_else(|| Error::unresolved_base(name, base))
    }

    fn resolve_bases(
        &self,
        name: &Name,
        extends: &[String],
        kind: PrototypeKind,
        root: Option<Name>,
    ) -> Result<Vec<Name>> {
        if extends.is_empty() {
            return Ok(root.filter(|r| r != name).into_iter().collect());
        }
        extends
            .iter()
            .map(|base| self.resolve_base(name, base, kind))
            .collect()
    }

    /// Registers and links every declaration of `module`.
    pub(crate) fn read(&mut self, module: RawModule) -> Result<()> {
        let count = module.len();
        self.read_atoms(module.atoms)?;
        self.read_link_properties(module.link_properties)?;
        self.read_links(module.links)?;
        self.read_concepts(module.concepts)?;
        debug!(module = %self.ns.current, declarations = count, "read module");
        Ok(())
    }

    // =========================================================================
    // Atoms
    // =========================================================================

    fn read_atoms(&mut self, atoms: Vec<RawAtom>) -> Result<()> {
        let mut pending = Vec::with_capacity(atoms.len());
        for raw in atoms {
            let name = self.ns.qualify(&raw.name);
            let mut constraints = ConstraintSet::new();
            for c in raw.constraints {
                if !c.is_atom_constraint() {
                    return Err(Error::invalid_constraint(format!(
                        "`{}` is not an atom constraint",
                        c.kind()
                    )))
                    .in_declaration(|| format!("atom {name}"), &raw.provenance);
                }
                constraints.add(c);
            }
            let atom = Atom::new(name.clone(), raw.provenance.clone())
                .with_attrs(raw.attrs)
                .with_constraints(constraints);
            self.register(atom)
                .in_declaration(|| format!("atom {name}"), &raw.provenance)?;
            pending.push((name, raw.extends, raw.provenance));
        }

        for (name, extends, prov) in pending {
            let Some(base) = extends else {
                continue;
            };
            let base = self
                .resolve_base(&name, &base, PrototypeKind::Atom)
                .in_declaration(|| format!("atom {name}"), &prov)?;
            if let Some(atom) = self.index.get_mut(&name).and_then(Prototype::as_atom_mut) {
                atom.base = Some(base);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Link properties
    // =========================================================================

    fn read_link_properties(&mut self, props: Vec<RawLinkProperty>) -> Result<()> {
        let mut pending = Vec::with_capacity(props.len());
        for raw in props {
            let name = self.ns.qualify(&raw.name);
            let prop = LinkProperty::generic(name.clone(), raw.provenance.clone()).with_attrs(raw.attrs);
            self.register(prop)
                .in_declaration(|| format!("link property {name}"), &raw.provenance)?;
            pending.push((name, raw.extends, raw.provenance));
        }

        for (name, extends, prov) in pending {
            let bases = self
                .resolve_bases(
                    &name,
                    &extends,
                    PrototypeKind::LinkProperty,
                    Some(builtins::root_property()),
                )
                .in_declaration(|| format!("link property {name}"), &prov)?;
            if let Some(prop) = self
                .index
                .get_mut(&name)
                .and_then(Prototype::as_link_property_mut)
            {
                prop.bases = bases;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Links
    // =========================================================================

    fn read_links(&mut self, links: Vec<RawLink>) -> Result<()> {
        let mut pending = Vec::with_capacity(links.len());
        for raw in links {
            let name = self.ns.qualify(&raw.name);
            let describe = || format!("link {name}");
            let mut link = Link::generic(name.clone(), raw.provenance.clone()).with_attrs(raw.attrs.clone());
            for c in raw.constraints.iter().cloned() {
                if c.is_atom_constraint() {
                    return Err(Error::invalid_constraint(format!(
                        "`{}` needs a target atom; declare it where the link is used",
                        c.kind()
                    )))
                    .in_declaration(describe, &raw.provenance);
                }
                add_constraint(&mut link.own_constraints, c, None)
                    .in_declaration(describe, &raw.provenance)?;
            }
            for c in raw.abstract_constraints.iter().cloned() {
                add_abstract_constraint(&mut link.own_abstract_constraints, c, None)
                    .in_declaration(describe, &raw.provenance)?;
            }
            self.register(link).in_declaration(describe, &raw.provenance)?;
            pending.push((name, raw));
        }

        for (name, raw) in pending {
            let describe = || format!("link {name}");
            let bases = self
                .resolve_bases(&name, &raw.extends, PrototypeKind::Link, Some(builtins::root_link()))
                .in_declaration(describe, &raw.provenance)?;
            if let Some(link) = self.index.get_mut(&name).and_then(Prototype::as_link_mut) {
                link.bases = bases;
            }
            for prop in raw.properties {
                let prov = prop.provenance.clone();
                let prop_name = prop.name.clone();
                self.property_use(&name, None, prop)
                    .in_declaration(|| format!("property {prop_name}"), &prov)
                    .in_declaration(describe, &raw.provenance)?;
            }
            for computable in raw.computables {
                self.read_computable(&name, PrototypeKind::LinkProperty, computable)
                    .in_declaration(describe, &raw.provenance)?;
            }
            let indexes = Self::indexes(raw.indexes);
            if let Some(link) = self.index.get_mut(&name).and_then(Prototype::as_link_mut) {
                link.own_indexes = indexes;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Concepts
    // =========================================================================

    fn read_concepts(&mut self, concepts: Vec<RawConcept>) -> Result<()> {
        let mut pending = Vec::with_capacity(concepts.len());
        for raw in concepts {
            let name = self.ns.qualify(&raw.name);
            let concept = Concept::new(name.clone(), raw.provenance.clone()).with_attrs(raw.attrs.clone());
            self.register(concept)
                .in_declaration(|| format!("concept {name}"), &raw.provenance)?;
            pending.push((name, raw));
        }

        for (name, raw) in pending {
            let describe = || format!("concept {name}");
            let root = (name != builtins::base_object()).then(builtins::root_concept);
            let bases = self
                .resolve_bases(&name, &raw.extends, PrototypeKind::Concept, root)
                .in_declaration(describe, &raw.provenance)?;
            if let Some(concept) = self.index.get_mut(&name).and_then(Prototype::as_concept_mut) {
                concept.bases = bases;
            }
            for link in raw.links {
                let prov = link.provenance.clone();
                let link_name = link.name.clone();
                self.link_use(&name, link)
                    .in_declaration(|| format!("link {link_name}"), &prov)
                    .in_declaration(describe, &raw.provenance)?;
            }
            for computable in raw.computables {
                self.read_computable(&name, PrototypeKind::Link, computable)
                    .in_declaration(describe, &raw.provenance)?;
            }
            let indexes = Self::indexes(raw.indexes);
            if let Some(concept) = self.index.get_mut(&name).and_then(Prototype::as_concept_mut) {
                concept.own_indexes = indexes;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Shared
    // =========================================================================

    /// Registers an unresolved computable on `source`.
    ///
    /// The pointer name resolves to an existing generic pointer of
    /// `pointer_kind` if there is one; otherwise it is qualified to the
    /// current module and the generic pointer is created once the
    /// computable's type is known.
    fn read_computable(
        &mut self,
        source: &Name,
        pointer_kind: PrototypeKind,
        raw: RawComputable,
    ) -> Result<Name> {
        let describe = || format!("computable {}", raw.name);
        let pointer = match self.ns.resolve_opt(self.index, &raw.name, &[pointer_kind]) {
            Some(pointer) => pointer,
            None if Name::is_qualified(&raw.name) => {
                return Err(Error::unresolved_name(&raw.name)).in_declaration(describe, &raw.provenance);
            }
            None => self.ns.qualify(&raw.name),
        };

        let clashes = self.index.get(source).is_some_and(|p| match p {
            Prototype::Concept(c) => c.own_pointers.contains_key(&pointer),
            Prototype::Link(l) => l.own_pointers.contains_key(&pointer),
            _ => false,
        });
        if clashes {
            return Err(Error::duplicate_name(format!(
                "{source} already declares pointer {pointer}"
            )))
            .in_declaration(describe, &raw.provenance);
        }

        let mut computable = Computable::new(source, &pointer, raw.expression, raw.provenance.clone());
        computable.title = raw.title;
        computable.description = raw.description;
        let name = self
            .register(computable)
            .in_declaration(describe, &raw.provenance)?;
        self.add_pointer(source, pointer, name.clone());
        Ok(name)
    }

    /// Records `declaration` under `pointer` on a concept or link.
    pub(crate) fn add_pointer(&mut self, source: &Name, pointer: Name, declaration: Name) {
        match self.index.get_mut(source) {
            Some(Prototype::Concept(c)) => c.add_pointer(pointer, declaration),
            Some(Prototype::Link(l)) => l.add_pointer(pointer, declaration),
            _ => {}
        }
    }

    fn indexes(raw: Vec<RawIndex>) -> Vec<SourceIndex> {
        let mut out: Vec<SourceIndex> = Vec::with_capacity(raw.len());
        for index in raw {
            let index = SourceIndex::new(index.expr, index.provenance);
            if !out.contains(&index) {
                out.push(index);
            }
        }
        out
    }
}
