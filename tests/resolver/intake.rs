//! Integration tests for declaration intake through the loader

use schemalink_foundation::{ErrorKind, Name, SourceMap};
use schemalink_resolver::{ImportContext, LoaderConfig, SchemaLoader, read_module};
use schemalink_schema::LinkMapping;

use crate::{load, load_with, tree};

#[test]
fn link_short_forms_load_the_same() {
    let short = load(r#"{"concepts": {"Person": {"links": {"name": "str"}}}}"#).unwrap();
    let listed = load(r#"{"concepts": {"Person": {"links": {"name": ["str"]}}}}"#).unwrap();
    let full = load(r#"{"concepts": {"Person": {"links": {"name": {"str": {}}}}}}"#).unwrap();
    assert_eq!(short.represent(), listed.represent());
    assert_eq!(short.represent(), full.represent());
}

#[test]
fn computable_short_form_loads_the_same() {
    let short = load(
        r#"{"concepts": {"Person": {"links": {"name": "str"}, "computables": {"shout": "upper(self.name)"}}}}"#,
    )
    .unwrap();
    let full = load(
        r#"{"concepts": {"Person": {"links": {"name": "str"}, "computables": {"shout": {"expression": "upper(self.name)"}}}}}"#,
    )
    .unwrap();
    assert_eq!(short.represent(), full.represent());
}

#[test]
fn read_module_keeps_declaration_order() {
    let module = read_module(
        &tree(
            r#"{"concepts": {
                "Zebra": {"links": {"stripes": "int64"}},
                "Aardvark": {"links": {"snout": "float64", "burrow": ["Hole", "Den"]}}
            }}"#,
        ),
        &ImportContext::new("zoo"),
        &LoaderConfig::default(),
    )
    .unwrap();
    let names: Vec<_> = module.concepts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Zebra", "Aardvark"]);
    assert_eq!(module.concepts[1].links.len(), 3);
    assert_eq!(module.len(), 2);
}

#[test]
fn mapping_may_be_written_as_an_integer() {
    let schema = load(r#"{"concepts": {"Person": {"links": {"spouse": {"Person": {"mapping": 11}}}}}}"#)
        .unwrap();
    let spouse = schema.pointer("Person", "spouse").unwrap().as_link().unwrap();
    assert_eq!(spouse.mapping(), LinkMapping::OneToOne);
}

#[test]
fn unknown_keys_depend_on_strictness() {
    let module = r#"{"concepts": {"Person": {"colour": "red", "links": {"name": "str"}}}}"#;
    let err = load(module).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));

    let schema = load_with(LoaderConfig::lenient(), module).unwrap();
    assert!(schema.pointer("Person", "name").is_ok());
}

#[test]
fn malformed_section_is_rejected() {
    let err = load(r#"{"concepts": ["Person"]}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));

    let err = load(r#"{"atoms": {"Pair": {"extends": ["int64", "str"]}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));
}

#[test]
fn dotted_declaration_names_are_rejected() {
    let err = load(r#"{"concepts": {"a.b": {}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));
    assert_eq!(err.context.and_then(|c| c.path), Some("concepts/a.b".to_string()));

    let err = load(r#"{"atoms": {"lib.Code": {"extends": "str"}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration(_)));
}

#[test]
fn unique_is_not_an_atom_constraint() {
    let err = load(r#"{"atoms": {"Code": {"extends": "str", "constraints": {"unique": true}}}}"#)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));
}

// =============================================================================
// Diagnostics
// =============================================================================

fn load_mapped(json: &str, sources: SourceMap) -> schemalink_foundation::Error {
    let mut loader = SchemaLoader::new().unwrap();
    let ctx = ImportContext::new("app")
        .with_document("app.schema")
        .with_source_map(sources);
    loader.load_module(&ctx, &tree(json)).unwrap_err()
}

#[test]
fn errors_point_at_the_declaration() {
    let err = load_mapped(
        r#"{"concepts": {"Child": {"extends": "Missing"}}}"#,
        SourceMap::new().with("concepts/Child", 7, 3),
    );
    assert!(matches!(err.kind, ErrorKind::UnresolvedBase { .. }));
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.declaration.as_deref(), Some("concept app.Child"));
    assert_eq!(ctx.source.as_deref(), Some("app.schema"));
    assert_eq!((ctx.line, ctx.column), (Some(7), Some(3)));
    assert!(err.to_string().contains("at app.schema:7:3 (concepts/Child)"));
}

#[test]
fn nested_errors_keep_enclosing_frames() {
    let err = load_mapped(
        r#"{"concepts": {"Person": {"links": {"friend": "Nobody"}}}}"#,
        SourceMap::new()
            .with("concepts/Person", 3, 5)
            .with("concepts/Person/links/friend", 5, 9),
    );
    assert!(matches!(err.kind, ErrorKind::UnresolvedName(_)));
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.declaration.as_deref(), Some("link friend"));
    assert_eq!(ctx.path.as_deref(), Some("concepts/Person/links/friend"));
    assert_eq!((ctx.line, ctx.column), (Some(5), Some(9)));
    assert_eq!(ctx.stack, vec!["concept app.Person".to_string()]);
}

#[test]
fn unmapped_child_falls_back_to_parent_position() {
    let err = load_mapped(
        r#"{"concepts": {"Person": {"links": {"friend": "Nobody"}}}}"#,
        SourceMap::new().with("concepts/Person", 3, 5),
    );
    let ctx = err.context.as_ref().unwrap();
    assert_eq!((ctx.line, ctx.column), (Some(3), Some(5)));
}

#[test]
fn failed_intake_leaves_loader_untouched() {
    let mut loader = SchemaLoader::new().unwrap();
    let before = loader.global().len();
    let result = loader.load_module(
        &ImportContext::new("app"),
        &tree(r#"{"concepts": {"Person": {"links": {"name": 42}}}}"#),
    );
    assert!(result.is_err());
    assert_eq!(loader.global().len(), before);
    assert!(!loader.is_loaded("app"));
    assert!(loader.global().get(&Name::new("app", "Person")).is_none());
}
