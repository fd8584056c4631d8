//! Integration tests for the schema index, namespaces, and schema lookups

use schemalink_foundation::{ErrorKind, Name, Provenance};
use schemalink_schema::{
    Atom, BUILTIN_MODULE, Concept, Namespace, PrototypeKind, Schema, SchemaIndex,
};

fn prov(module: &str) -> Provenance {
    Provenance::synthesized(module)
}

fn sample() -> SchemaIndex {
    let mut index = SchemaIndex::new();
    index.add(Atom::new(Name::new(BUILTIN_MODULE, "str"), prov(BUILTIN_MODULE))).unwrap();
    index.add(Concept::new(Name::new(BUILTIN_MODULE, "Object"), prov(BUILTIN_MODULE))).unwrap();
    index.add(Atom::new(Name::new("lib", "Code"), prov("lib")).with_base(Name::new(BUILTIN_MODULE, "str"))).unwrap();
    index.add(Concept::new(Name::new("app", "Person"), prov("app"))).unwrap();
    index.add(Atom::new(Name::new("app", "str"), prov("app"))).unwrap();
    index
}

// =============================================================================
// Namespace Resolution
// =============================================================================

#[test]
fn current_module_shadows_imports_and_builtins() {
    let index = sample();
    let ns = Namespace::new("app").with_alias("l", "lib");
    assert_eq!(ns.resolve(&index, "str", &[]).unwrap(), Name::new("app", "str"));
    assert_eq!(ns.resolve(&index, "Code", &[]).unwrap(), Name::new("lib", "Code"));
    assert_eq!(ns.resolve(&index, "Object", &[]).unwrap(), Name::new(BUILTIN_MODULE, "Object"));
}

#[test]
fn alias_prefix_expands() {
    let index = sample();
    let ns = Namespace::new("app").with_alias("l", "lib");
    assert_eq!(ns.resolve(&index, "l.Code", &[]).unwrap(), Name::new("lib", "Code"));
    assert_eq!(ns.resolve(&index, "lib.Code", &[]).unwrap(), Name::new("lib", "Code"));
}

#[test]
fn kind_filter_skips_incompatible_matches() {
    let index = sample();
    let ns = Namespace::new("app");
    assert!(ns.resolve_opt(&index, "Person", &[PrototypeKind::Atom]).is_none());
    let err = ns.resolve(&index, "Person", &[PrototypeKind::Link]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedName(_)));
}

#[test]
fn builtins_can_be_excluded() {
    let index = sample();
    let ns = Namespace::new("lib").without_builtin();
    assert!(ns.resolve_opt(&index, "Object", &[]).is_none());
}

// =============================================================================
// Index
// =============================================================================

#[test]
fn subclass_follows_bases() {
    let index = sample();
    let code = Name::new("lib", "Code");
    assert!(index.is_subclass(&code, &Name::new(BUILTIN_MODULE, "str")));
    assert!(index.is_subclass(&code, &code));
    assert!(!index.is_subclass(&code, &Name::new("app", "str")));
}

#[test]
fn module_presence() {
    let index = sample();
    assert!(index.has_module("lib"));
    assert!(!index.has_module("other"));
    assert_eq!(index.names(PrototypeKind::Concept).len(), 2);
}

// =============================================================================
// Schema
// =============================================================================

#[test]
fn schema_hides_builtins_unless_asked() {
    let schema = Schema::new(sample(), Some("app".to_string()), false);
    assert!(schema.get_opt("Object", None, false).is_none());
    assert!(schema.get_opt("Object", None, true).is_some());
    assert!(schema.get("builtins.str", None, false).is_err());
    assert_eq!(schema.iterate(None, false, false).count(), 3);
    assert_eq!(schema.iterate(None, true, false).count(), 5);
}

#[test]
fn schema_including_builtins_exposes_them() {
    let schema = Schema::new(sample(), Some("app".to_string()), true);
    assert!(schema.includes_builtin());
    assert_eq!(
        schema.get("Object", Some(PrototypeKind::Concept), false).unwrap().name(),
        &Name::new(BUILTIN_MODULE, "Object")
    );
}

#[test]
fn typed_accessors_check_kind() {
    let schema = Schema::new(sample(), Some("app".to_string()), false);
    assert!(schema.concept("Person").is_ok());
    assert!(schema.atom("Person").is_err());
    assert_eq!(schema.atom("str").unwrap().name, Name::new("app", "str"));
    assert_eq!(schema.main_module(), Some("app"));
}
