//! Sessions over registered module sources, and schema dumps

use schemalink_foundation::{ErrorKind, Name, SourceMap};
use schemalink_resolver::LoaderConfig;
use schemalink_runtime::{ModuleSource, SchemaSession, from_bytes, load_from_file, save_to_file, to_bytes};

use crate::tree;

fn library_session() -> SchemaSession {
    let mut session = SchemaSession::new().unwrap();
    session
        .register(ModuleSource::new(
            "core",
            tree(r#"{"atoms": {"Isbn": {"extends": "str", "constraints": {"min-length": 10}}}}"#),
        ))
        .unwrap();
    session
        .register(
            ModuleSource::new(
                "people",
                tree(r#"{"concepts": {"Author": {"links": {"name": {"str": {"required": true}}}}}}"#),
            )
            .with_import("c", "core"),
        )
        .unwrap();
    session
        .register(
            ModuleSource::new(
                "library",
                tree(
                    r#"{"concepts": {"Book": {
                        "links": {
                            "isbn": "c.Isbn",
                            "authors": {"p.Author": {"mapping": "**"}}
                        },
                        "computables": {"author_count": "count(self.authors)"}
                    }}}"#,
                ),
            )
            .with_import("c", "core")
            .with_import("p", "people"),
        )
        .unwrap();
    session
}

#[test]
fn session_loads_a_module_graph() {
    let mut session = library_session();
    let schema = session.load("library").unwrap();

    let authors = schema.pointer("Book", "authors").unwrap().as_link().unwrap();
    assert_eq!(authors.target, Some(Name::new("people", "Author")));
    let count = schema.pointer("Book", "author_count").unwrap().as_computable().unwrap();
    assert_eq!(count.target, Some(Name::new("builtins", "int64")));

    let modules: Vec<_> = session.loader().modules().collect();
    assert_eq!(modules, ["builtins", "core", "people", "library"]);
}

#[test]
fn loading_twice_is_a_duplicate() {
    let mut session = library_session();
    session.load("library").unwrap();
    let err = session.load("library").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(_)));
}

#[test]
fn session_errors_carry_the_document_position() {
    let mut session = SchemaSession::with_config(LoaderConfig::default()).unwrap();
    session
        .register(
            ModuleSource::new("app", tree(r#"{"concepts": {"Book": {"extends": "Missing"}}}"#))
                .with_document("app.schema")
                .with_source_map(SourceMap::new().with("concepts/Book", 2, 4)),
        )
        .unwrap();
    let err = session.load("app").unwrap_err();
    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.source.as_deref(), Some("app.schema"));
    assert_eq!((ctx.line, ctx.column), (Some(2), Some(4)));
}

#[test]
fn dump_of_a_session_schema_round_trips() {
    let mut session = library_session();
    let schema = session.load("library").unwrap();

    let dump = from_bytes(&to_bytes(&schema).unwrap()).unwrap();
    assert_eq!(dump.main_module.as_deref(), Some("library"));
    assert_eq!(dump.schema, schema.represent());

    let path = std::env::temp_dir().join("schemalink_session_dump.msgpack");
    save_to_file(&schema, &path).unwrap();
    let from_file = load_from_file(&path).unwrap();
    assert_eq!(from_file, dump);
    let _ = std::fs::remove_file(&path);
}
