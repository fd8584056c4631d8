//! Loading several modules into one loader

use schemalink_foundation::{ErrorKind, Name};
use schemalink_resolver::{ImportContext, SchemaLoader};
use schemalink_schema::PrototypeKind;

use crate::tree;

const BASE: &str = r#"{
    "atoms": {"Email": {"extends": "str", "constraints": {"regexp": "^[^@]+@[^@]+$"}}},
    "concepts": {"Named": {"abstract": true, "links": {"name": "str"}}}
}"#;

fn loader_with_base() -> SchemaLoader {
    let mut loader = SchemaLoader::new().unwrap();
    let loaded = loader
        .load_module(&ImportContext::new("base").with_toplevel(false), &tree(BASE))
        .unwrap();
    assert!(loaded.is_none());
    loader
}

#[test]
fn imported_declarations_resolve_through_aliases() {
    let mut loader = loader_with_base();
    let schema = loader
        .load_module(
            &ImportContext::new("app").with_import("b", "base"),
            &tree(r#"{"concepts": {"User": {"extends": "b.Named", "links": {"email": "b.Email"}}}}"#),
        )
        .unwrap()
        .unwrap();

    let user = schema.concept("User").unwrap();
    assert_eq!(user.bases, vec![Name::new("base", "Named")]);
    assert!(user.pointers.contains_key(&Name::new("base", "name")));
    let email = schema.pointer("User", "email").unwrap().as_link().unwrap();
    assert_eq!(email.target, Some(Name::new("base", "Email")));
}

#[test]
fn expressions_may_cross_modules() {
    let mut loader = loader_with_base();
    let schema = loader
        .load_module(
            &ImportContext::new("app").with_import("b", "base"),
            &tree(
                r#"{"concepts": {"User": {
                    "extends": "b.Named",
                    "computables": {"shout": "upper(self.name)"},
                    "indexes": ["self.name"]
                }}}"#,
            ),
        )
        .unwrap()
        .unwrap();
    let shout = schema.pointer("User", "shout").unwrap().as_computable().unwrap();
    assert_eq!(shout.target, Some(Name::new("builtins", "str")));
}

#[test]
fn schema_hides_builtins_unless_asked() {
    let mut loader = loader_with_base();
    let schema = loader
        .load_module(
            &ImportContext::new("app").with_import("b", "base"),
            &tree(r#"{"concepts": {"User": {"extends": "b.Named"}}}"#),
        )
        .unwrap()
        .unwrap();
    assert!(schema.index().has_module("base"));
    assert!(schema.concept("base.Named").is_ok());
    assert!(schema.get_opt("builtins.Object", Some(PrototypeKind::Concept), false).is_none());
    assert!(schema.get_opt("builtins.Object", Some(PrototypeKind::Concept), true).is_some());
}

#[test]
fn deferred_modules_are_ordered_with_the_top_level_load() {
    let mut loader = SchemaLoader::new().unwrap();
    let deferred = loader.load_module(
        &ImportContext::new("base").with_toplevel(false),
        &tree(r#"{"concepts": {"Thing": {"computables": {"broken": "self.nothing"}}}}"#),
    );
    assert!(matches!(deferred, Ok(None)));

    let err = loader
        .load_module(
            &ImportContext::new("app").with_import("b", "base"),
            &tree(r#"{"concepts": {"User": {}}}"#),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Expression { .. }));
    assert!(loader.is_loaded("base"));
    assert!(!loader.is_loaded("app"));
}

#[test]
fn materialize_revisits_a_loaded_module() {
    let mut loader = loader_with_base();
    loader
        .load_module(
            &ImportContext::new("app").with_import("b", "base"),
            &tree(r#"{"concepts": {"User": {"extends": "b.Named"}}}"#),
        )
        .unwrap();
    let schema = loader.materialize(Some("base")).unwrap();
    assert_eq!(schema.main_module(), Some("base"));
    assert!(schema.concept("Named").unwrap().is_abstract());
    assert_eq!(loader.modules().collect::<Vec<_>>(), ["builtins", "base", "app"]);
}
