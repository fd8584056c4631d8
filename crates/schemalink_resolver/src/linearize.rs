//! Inheritance linearization.
//!
//! Each kind is processed separately: build the graph of unmerged
//! declarations and their bases, sort it so bases come first, then fold
//! each declaration's own attributes over its already-merged bases.
//! Sorting and merging are independent; [`Merge`] holds the kind-specific
//! part.

use std::collections::HashMap;

use indexmap::IndexMap;
use schemalink_foundation::{Error, ErrorKind, Name, Result, ResultExt};
use schemalink_schema::{
    Atom, Concept, Link, LinkProperty, PointerMap, Prototype, PrototypeKind, SchemaIndex,
    SourceIndex,
};
use tracing::debug;

/// Dependency graph: node → bases.
pub(crate) type DependencyGraph = IndexMap<Name, Vec<Name>>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Orders `graph` so every node follows the nodes it depends on.
///
/// Edges to names outside the graph are ignored. Ties keep graph order.
///
/// # Errors
///
/// Returns `CyclicInheritance` naming every member of the first cycle
/// found, with the first member repeated at the end.
pub(crate) fn topological_order(graph: &DependencyGraph) -> Result<Vec<Name>> {
    fn visit(
        node: &Name,
        graph: &DependencyGraph,
        marks: &mut HashMap<Name, Mark>,
        path: &mut Vec<Name>,
        out: &mut Vec<Name>,
    ) -> Result<()> {
        match marks.get(node) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|n| n == node).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
                cycle.push(node.to_string());
                return Err(Error::cyclic_inheritance(cycle));
            }
            None => {}
        }
        marks.insert(node.clone(), Mark::Visiting);
        path.push(node.clone());
        for dep in graph.get(node).into_iter().flatten() {
            if graph.contains_key(dep) {
                visit(dep, graph, marks, path, out)?;
            }
        }
        path.pop();
        marks.insert(node.clone(), Mark::Done);
        out.push(node.clone());
        Ok(())
    }

    let mut marks = HashMap::with_capacity(graph.len());
    let mut path = Vec::new();
    let mut out = Vec::with_capacity(graph.len());
    for node in graph.keys() {
        visit(node, graph, &mut marks, &mut path, &mut out)?;
    }
    Ok(out)
}

// =============================================================================
// Merge strategies
// =============================================================================

/// Kind-specific inheritance.
pub(crate) trait Merge: Clone + Into<Prototype> {
    /// The kind this strategy merges.
    const KIND: PrototypeKind;

    /// Views a prototype as this kind.
    fn cast(proto: &Prototype) -> Option<&Self>;

    /// Returns true once merged.
    fn is_merged(&self) -> bool;

    /// Automatic atoms may extend final atoms.
    fn is_automatic(&self) -> bool;

    /// Recomputes the merged attributes from the declared ones and `bases`,
    /// left-most base first.
    fn merge(&mut self, bases: &[&Self]);
}

fn merge_pointers<'a>(own: &PointerMap, bases: impl Iterator<Item = &'a PointerMap>) -> PointerMap {
    let mut out = own.clone();
    for base in bases {
        for (pointer, decls) in base {
            out.entry(pointer.clone()).or_insert_with(|| decls.clone());
        }
    }
    out
}

fn merge_indexes<'a>(own: &[SourceIndex], bases: impl Iterator<Item = &'a [SourceIndex]>) -> Vec<SourceIndex> {
    let mut out = own.to_vec();
    for index in bases.flatten() {
        if !out.contains(index) {
            out.push(index.clone());
        }
    }
    out
}

impl Merge for Atom {
    const KIND: PrototypeKind = PrototypeKind::Atom;

    fn cast(proto: &Prototype) -> Option<&Self> {
        proto.as_atom()
    }

    fn is_merged(&self) -> bool {
        self.merged
    }

    fn is_automatic(&self) -> bool {
        self.automatic
    }

    fn merge(&mut self, bases: &[&Self]) {
        self.attrs = self.own.clone();
        self.constraints = self.own_constraints.clone();
        for base in bases {
            self.attrs.inherit(&base.attrs);
            self.constraints.inherit(&base.constraints);
        }
        self.merged = true;
    }
}

impl Merge for LinkProperty {
    const KIND: PrototypeKind = PrototypeKind::LinkProperty;

    fn cast(proto: &Prototype) -> Option<&Self> {
        proto.as_link_property()
    }

    fn is_merged(&self) -> bool {
        self.merged
    }

    fn is_automatic(&self) -> bool {
        false
    }

    fn merge(&mut self, bases: &[&Self]) {
        self.attrs = self.own.clone();
        self.constraints = self.own_constraints.clone();
        self.abstract_constraints = self.own_abstract_constraints.clone();
        for base in bases {
            self.attrs.inherit(&base.attrs);
            self.constraints.inherit(&base.constraints);
            self.constraints.inherit(&base.abstract_constraints);
            self.abstract_constraints.inherit(&base.abstract_constraints);
        }
        self.merged = true;
    }
}

impl Merge for Link {
    const KIND: PrototypeKind = PrototypeKind::Link;

    fn cast(proto: &Prototype) -> Option<&Self> {
        proto.as_link()
    }

    fn is_merged(&self) -> bool {
        self.merged
    }

    fn is_automatic(&self) -> bool {
        false
    }

    fn merge(&mut self, bases: &[&Self]) {
        self.attrs = self.own.clone();
        self.constraints = self.own_constraints.clone();
        self.abstract_constraints = self.own_abstract_constraints.clone();
        for base in bases {
            self.attrs.inherit(&base.attrs);
            self.constraints.inherit(&base.constraints);
            self.constraints.inherit(&base.abstract_constraints);
            self.abstract_constraints.inherit(&base.abstract_constraints);
            if self.is_atom.is_none() {
                self.is_atom = base.is_atom;
            }
        }
        self.pointers = merge_pointers(&self.own_pointers, bases.iter().map(|b| &b.pointers));
        self.indexes = merge_indexes(&self.own_indexes, bases.iter().map(|b| b.indexes.as_slice()));
        self.merged = true;
    }
}

impl Merge for Concept {
    const KIND: PrototypeKind = PrototypeKind::Concept;

    fn cast(proto: &Prototype) -> Option<&Self> {
        proto.as_concept()
    }

    fn is_merged(&self) -> bool {
        self.merged
    }

    fn is_automatic(&self) -> bool {
        false
    }

    fn merge(&mut self, bases: &[&Self]) {
        self.attrs = self.own.clone();
        for base in bases {
            self.attrs.inherit(&base.attrs);
        }
        self.pointers = merge_pointers(&self.own_pointers, bases.iter().map(|b| &b.pointers));
        self.indexes = merge_indexes(&self.own_indexes, bases.iter().map(|b| b.indexes.as_slice()));
        self.merged = true;
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Merges every unmerged declaration of kind `T`. Returns how many were
/// merged.
pub(crate) fn linearize_kind<T: Merge>(index: &mut SchemaIndex) -> Result<usize> {
    let graph: DependencyGraph = index
        .iterate(Some(T::KIND), true, true)
        .filter(|p| T::cast(p).is_some_and(|t| !t.is_merged()))
        .map(|p| (p.name().clone(), p.bases().to_vec()))
        .collect();

    let order = topological_order(&graph).map_err(|e| {
        let member = match &e.kind {
            ErrorKind::CyclicInheritance { cycle } => cycle.first().and_then(|m| Name::parse(m)),
            _ => None,
        };
        match member.as_ref().and_then(|n| index.get(n)) {
            Some(first) => e.in_declaration(&first.describe(), first.provenance()),
            None => e,
        }
    })?;

    for name in &order {
        let Some(proto) = index.get(name) else {
            continue;
        };
        let describe = proto.describe();
        let provenance = proto.provenance().clone();
        let merged = merge_one::<T>(index, name).in_declaration(|| describe, &provenance)?;
        if let Some(slot) = index.get_mut(name) {
            *slot = merged.into();
        }
    }
    Ok(order.len())
}

fn merge_one<T: Merge>(index: &SchemaIndex, name: &Name) -> Result<T> {
    let proto = index
        .get(name)
        .ok_or_else(|| Error::internal(format!("{name} vanished during linearization")))?;
    let mut child = T::cast(proto)
        .cloned()
        .ok_or_else(|| Error::internal(format!("{name} changed kind during linearization")))?;

    let mut bases = Vec::with_capacity(proto.bases().len());
    for base in proto.bases() {
        let base_proto = index
            .get(base)
            .ok_or_else(|| Error::unresolved_base(name, base))?;
        let base_decl = T::cast(base_proto).ok_or_else(|| Error::unresolved_base(name, base))?;
        if base_proto.is_final() && !child.is_automatic() {
            return Err(Error::final_inheritance(name, base));
        }
        bases.push(base_decl);
    }
    child.merge(&bases);
    Ok(child)
}

/// Merges every unmerged declaration, kind by kind.
pub(crate) fn linearize(index: &mut SchemaIndex) -> Result<()> {
    let atoms = linearize_kind::<Atom>(index)?;
    let link_properties = linearize_kind::<LinkProperty>(index)?;
    let links = linearize_kind::<Link>(index)?;
    let concepts = linearize_kind::<Concept>(index)?;
    debug!(atoms, link_properties, links, concepts, "linearized");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
