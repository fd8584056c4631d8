//! Materialization: the last step of a top-level load.
//!
//! Re-runs the linearizer for declarations created while ordering, applies
//! defaults to a copy of the global index, and checks that every reference
//! in the copy resolves. The copy becomes the [`Schema`].

use schemalink_foundation::{Error, Name, Result, ResultExt};
use schemalink_schema::{Prototype, Schema, SchemaIndex};
use tracing::debug;

use crate::linearize::linearize;

/// Builds the final schema from the global index.
///
/// # Errors
///
/// Returns linearization errors for late declarations and `UnresolvedName`
/// for any dangling reference.
pub(crate) fn materialize(
    global: &mut SchemaIndex,
    main_module: Option<String>,
    include_builtin: bool,
) -> Result<Schema> {
    linearize(global)?;

    let mut index = global.clone();
    let names: Vec<Name> = index
        .iterate(None, true, true)
        .map(|p| p.name().clone())
        .collect();
    for name in &names {
        if let Some(proto) = index.get_mut(name) {
            set_defaults(proto);
        }
    }
    for name in &names {
        if let Some(proto) = index.get(name) {
            validate(&index, proto).in_declaration(|| proto.describe(), proto.provenance())?;
        }
    }

    debug!(
        main_module = main_module.as_deref().unwrap_or("-"),
        declarations = index.len(),
        "materialized schema"
    );
    Ok(Schema::new(index, main_module, include_builtin))
}

fn set_defaults(proto: &mut Prototype) {
    match proto {
        Prototype::Atom(a) => {
            a.attrs.is_abstract.get_or_insert(false);
            a.attrs.is_final.get_or_insert(false);
        }
        Prototype::Concept(c) => {
            c.attrs.is_abstract.get_or_insert(false);
            c.attrs.is_final.get_or_insert(false);
        }
        Prototype::Link(l) => {
            l.attrs.mapping = Some(l.mapping());
            l.attrs.required.get_or_insert(false);
            l.attrs.readonly.get_or_insert(false);
            l.attrs.is_abstract.get_or_insert(false);
            l.attrs.is_final.get_or_insert(false);
        }
        Prototype::LinkProperty(p) => {
            p.attrs.readonly.get_or_insert(false);
        }
        Prototype::Computable(_) => {}
    }
}

fn require(index: &SchemaIndex, name: &Name, role: &str) -> Result<()> {
    if index.contains(name) {
        Ok(())
    } else {
        Err(Error::unresolved_name(format!("{role} {name}")))
    }
}

fn validate(index: &SchemaIndex, proto: &Prototype) -> Result<()> {
    for base in proto.bases() {
        require(index, base, "base")?;
    }
    let pointers = match proto {
        Prototype::Atom(_) => None,
        Prototype::Concept(c) => Some(&c.pointers),
        Prototype::Link(l) => {
            for name in l.source.iter().chain(l.target.iter()) {
                require(index, name, "endpoint")?;
            }
            Some(&l.pointers)
        }
        Prototype::LinkProperty(p) => {
            for name in p.source.iter().chain(p.target.iter()) {
                require(index, name, "endpoint")?;
            }
            None
        }
        Prototype::Computable(c) => {
            require(index, &c.source, "source")?;
            require(index, &c.pointer, "pointer")?;
            let target = c.target.as_ref().ok_or_else(|| {
                Error::internal(format!("computable {} was never resolved", c.name))
            })?;
            require(index, target, "target")?;
            None
        }
    };
    for (pointer, decls) in pointers.into_iter().flatten() {
        require(index, pointer, "pointer")?;
        for decl in decls {
            require(index, decl, "pointer")?;
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
