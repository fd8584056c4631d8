//! Canonical nested-mapping form of a schema.
//!
//! The output has the shape of a module document: declared attributes only,
//! short forms where the document grammar allows them, and local names for
//! declarations that a document in the main module could refer to locally.

use schemalink_foundation::{Name, RawMap, RawValue};

use crate::BUILTIN_MODULE;
use crate::constraint::ConstraintSet;
use crate::default::DefaultSpec;
use crate::kind::PrototypeKind;
use crate::proto::{Atom, Computable, Concept, Link, LinkProperty, PointerMap, Prototype, SourceIndex};
use crate::schema::Schema;

impl Schema {
    /// Produces the canonical nested mapping for the non-builtin part of the
    /// schema. Automatic atoms are folded back into inline constraints and
    /// implicitly created generic pointers are omitted.
    #[must_use]
    pub fn represent(&self) -> RawValue {
        let r = Representer { schema: self };
        let mut sections: Vec<(PrototypeKind, RawMap)> = PrototypeKind::SECTIONS
            .iter()
            .map(|k| (*k, RawMap::new()))
            .collect();

        for proto in self.index().iterate(None, false, false) {
            let entry = match proto {
                Prototype::Atom(a) => Some((PrototypeKind::Atom, r.atom(a))),
                Prototype::LinkProperty(p) if p.is_generic() && !p.implicit => {
                    Some((PrototypeKind::LinkProperty, r.generic_property(p)))
                }
                Prototype::Link(l) if l.is_generic() && !l.implicit => {
                    Some((PrototypeKind::Link, r.generic_link(l)))
                }
                Prototype::Concept(c) => Some((PrototypeKind::Concept, r.concept(c))),
                _ => None,
            };
            if let Some((kind, value)) = entry {
                if let Some((_, section)) = sections.iter_mut().find(|(k, _)| *k == kind) {
                    section.insert(r.short(proto.name()), value);
                }
            }
        }

        sections
            .into_iter()
            .filter(|(_, s)| !s.is_empty())
            .filter_map(|(k, s)| k.section().map(|key| (key, RawValue::Map(s))))
            .collect()
    }
}

struct Representer<'a> {
    schema: &'a Schema,
}

impl Representer<'_> {
    /// Local name if resolving it from the main module finds `name`.
    fn short(&self, name: &Name) -> String {
        let local = name.name();
        let mut candidates = Vec::new();
        if let Some(main) = self.schema.main_module() {
            candidates.push(Name::new(main, local));
        }
        candidates.push(Name::new(BUILTIN_MODULE, local));
        let first = candidates
            .into_iter()
            .find(|c| self.schema.index().contains(c));
        if first.as_ref() == Some(name) {
            local.to_string()
        } else {
            name.to_string()
        }
    }

    fn names(&self, names: &[Name]) -> RawValue {
        RawValue::List(names.iter().map(|n| RawValue::from(self.short(n))).collect())
    }

    fn atom(&self, atom: &Atom) -> RawValue {
        let mut out = RawMap::new();
        if let Some(base) = &atom.base {
            out.insert("extends".into(), self.short(base).into());
        }
        let own = &atom.own;
        if let Some(default) = &own.default {
            out.insert("default".into(), DefaultSpec::list_to_raw(default));
        }
        put_str(&mut out, "title", own.title.as_ref());
        put_str(&mut out, "description", own.description.as_ref());
        put_bool(&mut out, "abstract", own.is_abstract);
        put_bool(&mut out, "final", own.is_final);
        put_constraints(&mut out, "constraints", &atom.own_constraints);
        if let Some(attributes) = &own.attributes {
            out.insert("attributes".into(), RawValue::Map(attributes.clone()));
        }
        RawValue::Map(out)
    }

    fn generic_property(&self, prop: &LinkProperty) -> RawValue {
        let mut out = RawMap::new();
        self.extends(&mut out, &prop.bases, "link_property");
        put_str(&mut out, "title", prop.own.title.as_ref());
        put_str(&mut out, "description", prop.own.description.as_ref());
        put_bool(&mut out, "readonly", prop.own.readonly);
        RawValue::Map(out)
    }

    fn extends(&self, out: &mut RawMap, bases: &[Name], root: &str) {
        let is_root = bases.len() == 1 && bases[0] == Name::new(BUILTIN_MODULE, root);
        if !bases.is_empty() && !is_root {
            out.insert("extends".into(), self.names(bases));
        }
    }

    fn generic_link(&self, link: &Link) -> RawValue {
        let mut out = RawMap::new();
        self.extends(&mut out, &link.bases, "link");
        put_bool(&mut out, "abstract", link.own.is_abstract);
        put_bool(&mut out, "final", link.own.is_final);
        self.link_attrs(&mut out, link);
        self.link_pointers(&mut out, &link.own_pointers);
        put_constraints(&mut out, "constraints", &link.own_constraints);
        put_constraints(
            &mut out,
            "abstract-constraints",
            &link.own_abstract_constraints,
        );
        put_indexes(&mut out, &link.own_indexes);
        RawValue::Map(out)
    }

    fn link_attrs(&self, out: &mut RawMap, link: &Link) {
        let own = &link.own;
        put_str(out, "title", own.title.as_ref());
        put_str(out, "description", own.description.as_ref());
        put_bool(out, "readonly", own.readonly);
        if let Some(mapping) = own.mapping {
            out.insert("mapping".into(), mapping.as_str().into());
        }
        put_bool(out, "required", own.required);
        if let Some(default) = &own.default {
            out.insert("default".into(), DefaultSpec::list_to_raw(default));
        }
        if let Some(search) = own.search.and_then(|s| s.to_raw()) {
            out.insert("search".into(), search);
        }
    }

    fn link_pointers(&self, out: &mut RawMap, pointers: &PointerMap) {
        let mut properties = RawMap::new();
        let mut computables = RawMap::new();
        for (pointer, decls) in pointers {
            let key = self.short(pointer);
            let mut targets = RawMap::new();
            for decl in decls {
                match self.schema.index().get(decl) {
                    Some(Prototype::Computable(c)) => {
                        computables.insert(key.clone(), computable(c));
                    }
                    Some(Prototype::LinkProperty(p)) => {
                        let (target, info) = self.property_use(p);
                        targets.insert(target, info);
                    }
                    _ => {}
                }
            }
            if !targets.is_empty() {
                properties.insert(key, collapse(targets));
            }
        }
        if !properties.is_empty() {
            out.insert("properties".into(), RawValue::Map(properties));
        }
        if !computables.is_empty() {
            out.insert("computables".into(), RawValue::Map(computables));
        }
    }

    /// Target key and info map of a pointer use; automatic targets are
    /// reported as their base with the atom's constraints inline.
    fn target_key(&self, target: Option<&Name>, constraints: &mut ConstraintSet) -> String {
        let Some(target) = target else {
            return String::new();
        };
        match self.schema.index().atom(target) {
            Some(atom) if atom.automatic => {
                for c in atom.own_constraints.iter() {
                    constraints.add(c.clone());
                }
                atom.base.as_ref().map_or_else(|| self.short(target), |b| self.short(b))
            }
            _ => self.short(target),
        }
    }

    fn property_use(&self, prop: &LinkProperty) -> (String, RawValue) {
        let mut constraints = ConstraintSet::new();
        let target = self.target_key(prop.target.as_ref(), &mut constraints);
        for c in prop.own_constraints.iter() {
            constraints.add(c.clone());
        }

        let mut out = RawMap::new();
        put_str(&mut out, "title", prop.own.title.as_ref());
        put_str(&mut out, "description", prop.own.description.as_ref());
        put_bool(&mut out, "readonly", prop.own.readonly);
        if let Some(default) = &prop.own.default {
            out.insert("default".into(), DefaultSpec::list_to_raw(default));
        }
        put_constraints(&mut out, "constraints", &constraints);
        put_constraints(
            &mut out,
            "abstract-constraints",
            &prop.own_abstract_constraints,
        );
        (target, RawValue::Map(out))
    }

    fn link_use(&self, link: &Link) -> (String, RawValue) {
        let mut constraints = ConstraintSet::new();
        let target = self.target_key(link.target.as_ref(), &mut constraints);
        for c in link.own_constraints.iter() {
            constraints.add(c.clone());
        }

        let mut out = RawMap::new();
        self.link_attrs(&mut out, link);
        self.link_pointers(&mut out, &link.own_pointers);
        put_constraints(&mut out, "constraints", &constraints);
        put_constraints(
            &mut out,
            "abstract-constraints",
            &link.own_abstract_constraints,
        );
        (target, RawValue::Map(out))
    }

    fn concept(&self, concept: &Concept) -> RawValue {
        let mut out = RawMap::new();
        self.extends(&mut out, &concept.bases, "Object");
        put_str(&mut out, "title", concept.own.title.as_ref());
        put_str(&mut out, "description", concept.own.description.as_ref());
        put_bool(&mut out, "abstract", concept.own.is_abstract);
        put_bool(&mut out, "final", concept.own.is_final);

        let mut links = RawMap::new();
        let mut computables = RawMap::new();
        for (pointer, decls) in &concept.own_pointers {
            let key = self.short(pointer);
            let mut targets = RawMap::new();
            for decl in decls {
                match self.schema.index().get(decl) {
                    Some(Prototype::Computable(c)) => {
                        computables.insert(key.clone(), computable(c));
                    }
                    Some(Prototype::Link(l)) => {
                        let (target, info) = self.link_use(l);
                        targets.insert(target, info);
                    }
                    _ => {}
                }
            }
            if !targets.is_empty() {
                links.insert(key, collapse(targets));
            }
        }
        if !links.is_empty() {
            out.insert("links".into(), RawValue::Map(links));
        }
        if !computables.is_empty() {
            out.insert("computables".into(), RawValue::Map(computables));
        }
        put_indexes(&mut out, &concept.own_indexes);
        RawValue::Map(out)
    }
}

/// A single target with no attributes collapses to the bare target name.
fn collapse(targets: RawMap) -> RawValue {
    if targets.len() == 1 {
        if let Some((target, RawValue::Map(info))) = targets.first() {
            if info.is_empty() {
                return RawValue::from(target.as_str());
            }
        }
    }
    RawValue::Map(targets)
}

fn computable(c: &Computable) -> RawValue {
    if c.title.is_none() && c.description.is_none() {
        return RawValue::from(c.expression.as_str());
    }
    let mut out = RawMap::new();
    out.insert("expression".into(), c.expression.as_str().into());
    put_str(&mut out, "title", c.title.as_ref());
    put_str(&mut out, "description", c.description.as_ref());
    RawValue::Map(out)
}

fn put_str(out: &mut RawMap, key: &str, value: Option<&String>) {
    if let Some(v) = value {
        out.insert(key.into(), v.as_str().into());
    }
}

fn put_bool(out: &mut RawMap, key: &str, value: Option<bool>) {
    if let Some(v) = value {
        out.insert(key.into(), v.into());
    }
}

fn put_constraints(out: &mut RawMap, key: &str, constraints: &ConstraintSet) {
    if !constraints.is_empty() {
        out.insert(key.into(), constraints.to_raw());
    }
}

fn put_indexes(out: &mut RawMap, indexes: &[SourceIndex]) {
    if indexes.is_empty() {
        return;
    }
    let mut exprs: Vec<&str> = indexes.iter().map(|i| i.expr.as_str()).collect();
    exprs.sort_unstable();
    out.insert(
        "indexes".into(),
        RawValue::List(exprs.into_iter().map(RawValue::from).collect()),
    );
}
