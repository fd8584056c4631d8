//! The ordering phase of a top-level load.
//!
//! Runs after every module's declarations are registered and merged:
//! type-checks embedded expressions and checks the pointer rules that need
//! whole-schema knowledge (target kinds, atomic mappings).

use schemalink_foundation::{Error, ErrorKind, Name, Provenance, Result, ResultExt};
use schemalink_schema::{
    DefaultSpec, LinkMapping, Namespace, Prototype, PrototypeKind, SchemaIndex, SourceIndex,
};
use tracing::debug;

use crate::config::LoaderConfig;
use crate::expr::{ExpressionResolver, ExpressionService};
use crate::linker::Linker;

/// Orders the declarations registered through `ns`.
pub(crate) fn order<S: ExpressionService + ?Sized>(
    index: &mut SchemaIndex,
    ns: &mut Namespace,
    service: &S,
    config: &LoaderConfig,
) -> Result<()> {
    let mut ordering = Ordering {
        index,
        ns,
        service,
        config,
    };
    ordering.check_links()?;
    ordering.check_concepts()?;
    ordering.resolve_defaults(PrototypeKind::LinkProperty)?;
    ordering.resolve_defaults(PrototypeKind::Link)?;
    let computables = ordering.resolve_computables()?;
    ordering.resolve_indexes()?;
    debug!(module = %ordering.ns.current, computables, "ordered module");
    Ok(())
}

struct Ordering<'a, S: ?Sized> {
    index: &'a mut SchemaIndex,
    ns: &'a mut Namespace,
    service: &'a S,
    config: &'a LoaderConfig,
}

impl<S: ExpressionService + ?Sized> Ordering<'_, S> {
    fn resolver(&self) -> ExpressionResolver<'_, S> {
        ExpressionResolver::new(self.service, self.index, self.ns)
            .with_atomic_indexes(self.config.require_atomic_indexes)
    }

    fn declared(&self, kind: PrototypeKind) -> Vec<Name> {
        self.ns.declared(self.index, kind)
    }

    fn context(&self, name: &Name) -> (String, Provenance) {
        self.index.get(name).map_or_else(
            || (name.to_string(), Provenance::synthesized(name.module())),
            |p| (p.describe(), p.provenance().clone()),
        )
    }

    // =========================================================================
    // Pointer checks
    // =========================================================================

    /// A specialization must agree with its generic link on whether the
    /// target is an atom, and atomic links only map one-to-one.
    fn check_links(&self) -> Result<()> {
        for name in self.declared(PrototypeKind::Link) {
            let Some(link) = self.index.link(&name) else {
                continue;
            };
            let (describe, prov) = self.context(&name);
            if link.source.is_some() {
                let generic = link.normal_name();
                let generic_atom = self.index.link(generic).and_then(|g| g.is_atom);
                if let (Some(expected), Some(actual)) = (generic_atom, link.is_atom) {
                    if expected != actual {
                        let kind = |atomic| if atomic { "an atom" } else { "a concept" };
                        return Err(Error::new(ErrorKind::PointerTargetConflict(format!(
                            "{generic} targets {}, {name} targets {}",
                            kind(expected),
                            kind(actual)
                        ))))
                        .in_declaration(|| describe, &prov);
                    }
                }
            }
            if link.is_atomic() && link.mapping() != LinkMapping::OneToOne {
                return Err(Error::new(ErrorKind::InvalidMapping {
                    pointer: name.to_string(),
                    mapping: link.mapping().to_string(),
                }))
                .in_declaration(|| describe, &prov);
            }
        }
        Ok(())
    }

    /// One pointer name on a concept targets only atoms or only concepts.
    fn check_concepts(&self) -> Result<()> {
        for name in self.declared(PrototypeKind::Concept) {
            let Some(concept) = self.index.concept(&name) else {
                continue;
            };
            for (pointer, decls) in &concept.own_pointers {
                let kinds: Vec<bool> = decls
                    .iter()
                    .filter_map(|d| self.index.link(d).and_then(|l| l.is_atom))
                    .collect();
                if kinds.contains(&true) && kinds.contains(&false) {
                    let (describe, prov) = self.context(&name);
                    return Err(Error::new(ErrorKind::PointerTargetConflict(format!(
                        "{pointer} mixes atom and concept targets"
                    ))))
                    .in_declaration(|| describe, &prov);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    fn resolve_defaults(&mut self, kind: PrototypeKind) -> Result<()> {
        for name in self.declared(kind) {
            let Some(proto) = self.index.get(&name) else {
                continue;
            };
            let (target, mapping) = match proto {
                Prototype::Link(l) => (l.target.clone(), l.mapping()),
                Prototype::LinkProperty(p) => (p.target.clone(), LinkMapping::OneToOne),
                _ => continue,
            };
            let Some(target) = target else {
                continue;
            };
            let mut updated = proto.clone();
            let (describe, prov) = self.context(&name);
            {
                let resolver = self.resolver();
                let check = |text: &str| resolver.default_query(&name, &target, mapping, text);
                let (own, merged) = match &mut updated {
                    Prototype::Link(l) => (&mut l.own.default, &mut l.attrs.default),
                    Prototype::LinkProperty(p) => (&mut p.own.default, &mut p.attrs.default),
                    _ => continue,
                };
                resolve_queries(own, &check).in_declaration(|| describe.clone(), &prov)?;
                resolve_queries(merged, &check).in_declaration(|| describe, &prov)?;
            }
            if let Some(slot) = self.index.get_mut(&name) {
                *slot = updated;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Computables
    // =========================================================================

    /// Resolves computables until none is left or no progress is made.
    /// A computable may walk through another, so order within a module
    /// does not matter.
    fn resolve_computables(&mut self) -> Result<usize> {
        let mut pending: Vec<Name> = self
            .declared(PrototypeKind::Computable)
            .into_iter()
            .filter(|n| self.index.computable(n).is_some_and(|c| !c.is_resolved()))
            .collect();
        let total = pending.len();
        while !pending.is_empty() {
            let before = pending.len();
            let mut failed = Vec::new();
            let mut first_error = None;
            for name in pending {
                if let Err(e) = self.resolve_computable(&name) {
                    first_error.get_or_insert(e);
                    failed.push(name);
                }
            }
            if failed.len() == before {
                if let Some(e) = first_error {
                    return Err(e);
                }
            }
            pending = failed;
        }
        Ok(total)
    }

    fn resolve_computable(&mut self, name: &Name) -> Result<()> {
        let Some(computable) = self.index.computable(name) else {
            return Ok(());
        };
        let source = computable.source.clone();
        let pointer = computable.pointer.clone();
        let expression = computable.expression.clone();
        let (describe, prov) = self.context(name);

        let resolved = self
            .resolver()
            .computable(name, &source, &expression)
            .in_declaration(|| describe.clone(), &prov)?;

        if !self.index.contains(&pointer) {
            let mut linker = Linker::new(self.index, self.ns);
            let created = if linker.index.get_kind(&source, PrototypeKind::Link).is_some() {
                linker.ensure_generic_property(pointer.name(), &prov)
            } else {
                linker.ensure_generic_link(pointer.name(), Some(resolved.is_atom), &prov)
            };
            created.in_declaration(|| describe, &prov)?;
        }

        if let Some(c) = self.index.get_mut(name).and_then(Prototype::as_computable_mut) {
            c.resolved = Some(resolved.text);
            c.target = Some(resolved.target);
            c.is_atom = Some(resolved.is_atom);
            c.is_local = resolved.is_local;
            c.bases = vec![pointer];
        }
        Ok(())
    }

    // =========================================================================
    // Indexes
    // =========================================================================

    fn resolve_indexes(&mut self) -> Result<()> {
        let mut owners = self.declared(PrototypeKind::Concept);
        owners.extend(self.declared(PrototypeKind::Link));
        for name in owners {
            let Some(proto) = self.index.get(&name) else {
                continue;
            };
            let mut updated = proto.clone();
            let (describe, prov) = self.context(&name);
            {
                let resolver = self.resolver();
                let (own, merged) = match &mut updated {
                    Prototype::Concept(c) => (&mut c.own_indexes, &mut c.indexes),
                    Prototype::Link(l) => (&mut l.own_indexes, &mut l.indexes),
                    _ => continue,
                };
                for index in own.iter_mut().chain(merged.iter_mut()) {
                    resolve_index(&resolver, &name, index)
                        .in_declaration(|| describe.clone(), &prov)?;
                }
            }
            if let Some(slot) = self.index.get_mut(&name) {
                *slot = updated;
            }
        }
        Ok(())
    }
}

fn resolve_queries(
    defaults: &mut Option<Vec<DefaultSpec>>,
    check: &impl Fn(&str) -> Result<String>,
) -> Result<()> {
    for spec in defaults.iter_mut().flatten() {
        if let DefaultSpec::Query { text, resolved } = spec {
            if resolved.is_none() {
                *resolved = Some(check(text)?);
            }
        }
    }
    Ok(())
}

fn resolve_index<S: ExpressionService + ?Sized>(
    resolver: &ExpressionResolver<'_, S>,
    owner: &Name,
    index: &mut SourceIndex,
) -> Result<()> {
    if index.resolved.is_none() {
        index.resolved = Some(resolver.index(owner, &index.expr)?);
    }
    Ok(())
}
