//! Declaration intake.
//!
//! Turns one module's raw tree into typed, unlinked declarations. Short
//! forms are normalized here so later stages only see one shape:
//!
//! - link on a concept: `name: T` ≡ `name: [T]` ≡ `name: {T: {}}`
//! - link property use: `p: atom` ≡ `p: {atom: {}}`
//! - computable: `c: "expr"` ≡ `c: {expression: "expr"}`
//! - `extends: X` ≡ `extends: [X]`, `default: v` ≡ `default: [v]`
//!
//! Intake never resolves names or types.

mod decl;
mod fields;

pub use decl::{
    RawAtom, RawComputable, RawConcept, RawIndex, RawLink, RawLinkProperty, RawLinkUse, RawModule,
    RawPropertyUse,
};

use schemalink_foundation::{Error, Provenance, RawMap, RawValue, Result, ResultExt, SourceMap};
use schemalink_schema::{AtomAttrs, ConceptAttrs, LinkAttrs, PropertyAttrs};

use crate::config::LoaderConfig;
use crate::context::ImportContext;
use fields::Fields;

const MODULE_KEYS: &[&str] = &["atoms", "link-properties", "links", "concepts"];

const ATOM_KEYS: &[&str] = &[
    "extends",
    "default",
    "title",
    "description",
    "abstract",
    "final",
    "attributes",
    "constraints",
];

const LINK_PROPERTY_KEYS: &[&str] = &["extends", "title", "description", "readonly"];

const LINK_KEYS: &[&str] = &[
    "extends",
    "title",
    "description",
    "abstract",
    "final",
    "readonly",
    "mapping",
    "required",
    "default",
    "properties",
    "computables",
    "indexes",
    "constraints",
    "abstract-constraints",
    "search",
];

const CONCEPT_KEYS: &[&str] = &[
    "extends",
    "title",
    "description",
    "abstract",
    "final",
    "links",
    "computables",
    "indexes",
];

const LINK_USE_KEYS: &[&str] = &[
    "mapping",
    "required",
    "title",
    "description",
    "readonly",
    "default",
    "properties",
    "search",
    "constraints",
    "abstract-constraints",
];

const PROPERTY_USE_KEYS: &[&str] = &[
    "title",
    "description",
    "readonly",
    "default",
    "constraints",
    "abstract-constraints",
];

const COMPUTABLE_KEYS: &[&str] = &["expression", "title", "description"];

/// Reads one module tree.
///
/// # Errors
///
/// Returns `InvalidDeclaration` for malformed declarations and
/// `InvalidConstraint` for malformed constraints, attributed to the
/// offending declaration.
pub fn read_module(tree: &RawValue, ctx: &ImportContext, config: &LoaderConfig) -> Result<RawModule> {
    let reader = Reader {
        module: &ctx.module,
        document: ctx.document.as_ref(),
        sources: &ctx.source_map,
        strict: config.strict_keys,
    };
    reader.module(tree)
}

struct Reader<'a> {
    module: &'a str,
    document: Option<&'a String>,
    sources: &'a SourceMap,
    strict: bool,
}

impl Reader<'_> {
    fn root(&self, section: &str) -> Provenance {
        Provenance::new(self.module, section)
            .with_document(self.document.cloned())
            .with_position(self.sources.position(section))
    }

    fn module(&self, tree: &RawValue) -> Result<RawModule> {
        let module_prov = Provenance::new(self.module, "")
            .with_document(self.document.cloned());
        let fields = Fields::new(tree, MODULE_KEYS, self.strict)
            .in_declaration(|| format!("module {}", self.module), &module_prov)?;

        let mut out = RawModule::default();
        let section = |key: &'static str| -> Result<Vec<(String, RawValue, Provenance)>> {
            let root = self.root(key);
            let entries = fields
                .map(key)
                .in_declaration(|| format!("module {}", self.module), &root)?;
            let mut out = Vec::new();
            for (name, body) in entries.into_iter().flat_map(|map| map.iter()) {
                let prov = root.child(name, self.sources);
                if name.is_empty() || name.contains('.') {
                    return Err(Error::invalid_declaration(format!(
                        "`{name}` is not a valid local name"
                    )))
                    .in_declaration(|| format!("module {}", self.module), &prov);
                }
                out.push((name.clone(), body.clone(), prov));
            }
            Ok(out)
        };

        for (name, body, prov) in section("atoms")? {
            out.atoms.push(
                self.atom(&name, &body, &prov)
                    .in_declaration(|| format!("atom {}.{name}", self.module), &prov)?,
            );
        }
        for (name, body, prov) in section("link-properties")? {
            out.link_properties.push(
                self.link_property(&name, &body, &prov)
                    .in_declaration(|| format!("link property {}.{name}", self.module), &prov)?,
            );
        }
        for (name, body, prov) in section("links")? {
            out.links.push(
                self.link(&name, &body, &prov)
                    .in_declaration(|| format!("link {}.{name}", self.module), &prov)?,
            );
        }
        for (name, body, prov) in section("concepts")? {
            out.concepts.push(
                self.concept(&name, &body, &prov)
                    .in_declaration(|| format!("concept {}.{name}", self.module), &prov)?,
            );
        }
        Ok(out)
    }

    fn atom(&self, name: &str, body: &RawValue, prov: &Provenance) -> Result<RawAtom> {
        let f = Fields::new(body, ATOM_KEYS, self.strict)?;
        let mut extends = f.names("extends")?;
        if extends.len() > 1 {
            return Err(Error::invalid_declaration(
                "an atom extends at most one base",
            ));
        }
        let attrs = AtomAttrs {
            default: f.defaults("default"),
            title: f.str("title")?,
            description: f.str("description")?,
            is_abstract: f.bool("abstract")?,
            is_final: f.bool("final")?,
            attributes: f.map("attributes")?.cloned(),
        };
        Ok(RawAtom {
            name: name.to_string(),
            extends: extends.pop(),
            attrs,
            constraints: f.constraints("constraints")?,
            provenance: prov.clone(),
        })
    }

    fn link_property(&self, name: &str, body: &RawValue, prov: &Provenance) -> Result<RawLinkProperty> {
        let f = Fields::new(body, LINK_PROPERTY_KEYS, self.strict)?;
        Ok(RawLinkProperty {
            name: name.to_string(),
            extends: f.names("extends")?,
            attrs: PropertyAttrs {
                title: f.str("title")?,
                description: f.str("description")?,
                readonly: f.bool("readonly")?,
                default: None,
            },
            provenance: prov.clone(),
        })
    }

    fn link_attrs(f: &Fields<'_>) -> Result<LinkAttrs> {
        Ok(LinkAttrs {
            mapping: f.mapping("mapping")?,
            required: f.bool("required")?,
            readonly: f.bool("readonly")?,
            title: f.str("title")?,
            description: f.str("description")?,
            default: f.defaults("default"),
            search: f.search("search")?,
            is_abstract: None,
            is_final: None,
        })
    }

    fn link(&self, name: &str, body: &RawValue, prov: &Provenance) -> Result<RawLink> {
        let f = Fields::new(body, LINK_KEYS, self.strict)?;
        let mut attrs = Self::link_attrs(&f)?;
        attrs.is_abstract = f.bool("abstract")?;
        attrs.is_final = f.bool("final")?;
        Ok(RawLink {
            name: name.to_string(),
            extends: f.names("extends")?,
            attrs,
            properties: self.properties(f.map("properties")?, prov)?,
            computables: self.computables(f.map("computables")?, prov)?,
            indexes: self.indexes(&f, prov)?,
            constraints: f.constraints("constraints")?,
            abstract_constraints: f.constraints("abstract-constraints")?,
            provenance: prov.clone(),
        })
    }

    fn concept(&self, name: &str, body: &RawValue, prov: &Provenance) -> Result<RawConcept> {
        let f = Fields::new(body, CONCEPT_KEYS, self.strict)?;
        let attrs = ConceptAttrs {
            title: f.str("title")?,
            description: f.str("description")?,
            is_abstract: f.bool("abstract")?,
            is_final: f.bool("final")?,
        };

        let mut links = Vec::new();
        if let Some(map) = f.map("links")? {
            let links_prov = prov.child("links", self.sources);
            for (link_name, value) in map {
                let link_prov = links_prov.child(link_name, self.sources);
                let targets = self
                    .targets(value, &link_prov)
                    .in_declaration(|| format!("link {link_name}"), &link_prov)?;
                for (target, info, target_prov) in targets {
                    links.push(
                        self.link_use(link_name, target, info, &target_prov)
                            .in_declaration(|| format!("link {link_name}"), &target_prov)?,
                    );
                }
            }
        }

        Ok(RawConcept {
            name: name.to_string(),
            extends: f.names("extends")?,
            attrs,
            links,
            computables: self.computables(f.map("computables")?, prov)?,
            indexes: self.indexes(&f, prov)?,
            provenance: prov.clone(),
        })
    }

    /// Expands the target forms of a concept link: a name, a list of names,
    /// or a mapping from target to attributes.
    fn targets<'v>(
        &self,
        value: &'v RawValue,
        prov: &Provenance,
    ) -> Result<Vec<(String, &'v RawValue, Provenance)>> {
        const EMPTY: &RawValue = &RawValue::Null;
        let target = |t: &RawValue| -> Result<String> {
            t.as_str().map(str::to_string).ok_or_else(|| {
                Error::invalid_declaration(format!(
                    "link target must be a name, got {}",
                    t.type_name()
                ))
            })
        };
        let out = match value {
            RawValue::Str(t) => vec![(t.clone(), EMPTY, prov.clone())],
            RawValue::List(items) => items
                .iter()
                .map(|t| {
                    let t = target(t)?;
                    let p = prov.child(&t, self.sources);
                    Ok((t, EMPTY, p))
                })
                .collect::<Result<_>>()?,
            RawValue::Map(map) if !map.is_empty() => map
                .iter()
                .map(|(t, info)| (t.clone(), info, prov.child(t, self.sources)))
                .collect(),
            other => {
                return Err(Error::invalid_declaration(format!(
                    "link needs a target, got {}",
                    other.type_name()
                )));
            }
        };
        Ok(out)
    }

    fn link_use(&self, name: &str, target: String, info: &RawValue, prov: &Provenance) -> Result<RawLinkUse> {
        let f = Fields::new(info, LINK_USE_KEYS, self.strict)?;
        Ok(RawLinkUse {
            name: name.to_string(),
            target,
            attrs: Self::link_attrs(&f)?,
            properties: self.properties(f.map("properties")?, prov)?,
            constraints: f.constraints("constraints")?,
            abstract_constraints: f.constraints("abstract-constraints")?,
            provenance: prov.clone(),
        })
    }

    fn properties(&self, map: Option<&RawMap>, prov: &Provenance) -> Result<Vec<RawPropertyUse>> {
        let Some(map) = map else {
            return Ok(Vec::new());
        };
        let props_prov = prov.child("properties", self.sources);
        let mut out = Vec::new();
        for (name, value) in map {
            let p = props_prov.child(name, self.sources);
            let prop = self
                .property_use(name, value, &p)
                .in_declaration(|| format!("property {name}"), &p)?;
            out.push(prop);
        }
        Ok(out)
    }

    fn property_use(&self, name: &str, value: &RawValue, prov: &Provenance) -> Result<RawPropertyUse> {
        let (target, info) = match value {
            RawValue::Str(t) => (t.clone(), &RawValue::Null),
            RawValue::Map(map) if map.len() == 1 => {
                let Some((t, info)) = map.first() else {
                    return Err(Error::internal("single-entry map has no entry"));
                };
                (t.clone(), info)
            }
            other => {
                return Err(Error::invalid_declaration(format!(
                    "property needs exactly one target atom, got {other}"
                )));
            }
        };
        let f = Fields::new(info, PROPERTY_USE_KEYS, self.strict)?;
        Ok(RawPropertyUse {
            name: name.to_string(),
            target,
            attrs: PropertyAttrs {
                title: f.str("title")?,
                description: f.str("description")?,
                readonly: f.bool("readonly")?,
                default: f.defaults("default"),
            },
            constraints: f.constraints("constraints")?,
            abstract_constraints: f.constraints("abstract-constraints")?,
            provenance: prov.clone(),
        })
    }

    fn computables(&self, map: Option<&RawMap>, prov: &Provenance) -> Result<Vec<RawComputable>> {
        let Some(map) = map else {
            return Ok(Vec::new());
        };
        let comps_prov = prov.child("computables", self.sources);
        let mut out = Vec::new();
        for (name, value) in map {
            let p = comps_prov.child(name, self.sources);
            let computable = match value {
                RawValue::Str(expr) => RawComputable {
                    name: name.clone(),
                    expression: expr.clone(),
                    title: None,
                    description: None,
                    provenance: p,
                },
                other => {
                    let f = Fields::new(other, COMPUTABLE_KEYS, self.strict)
                        .in_declaration(|| format!("computable {name}"), &p)?;
                    let expression = f
                        .str("expression")
                        .and_then(|e| {
                            e.ok_or_else(|| Error::invalid_declaration("computable needs an expression"))
                        })
                        .in_declaration(|| format!("computable {name}"), &p)?;
                    RawComputable {
                        name: name.clone(),
                        expression,
                        title: f.str("title")?,
                        description: f.str("description")?,
                        provenance: p,
                    }
                }
            };
            out.push(computable);
        }
        Ok(out)
    }

    fn indexes(&self, f: &Fields<'_>, prov: &Provenance) -> Result<Vec<RawIndex>> {
        let p = prov.child("indexes", self.sources);
        Ok(f.expressions("indexes")?
            .into_iter()
            .map(|expr| RawIndex {
                expr,
                provenance: p.clone(),
            })
            .collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
