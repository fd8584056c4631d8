//! Integration tests for Error types
//!
//! Tests error construction, display, and declaration context.

use schemalink_foundation::{
    Error, ErrorContext, ErrorKind, Position, Provenance, Result, ResultExt, SourceMap,
};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unresolved_base() {
    let err = Error::unresolved_base("app.Child", "Missing");
    assert!(matches!(err.kind, ErrorKind::UnresolvedBase { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("app.Child"));
    assert!(msg.contains("Missing"));
}

#[test]
fn error_final_inheritance() {
    let err = Error::final_inheritance("app.B", "app.A");
    assert!(matches!(err.kind, ErrorKind::FinalInheritance { .. }));
    assert!(format!("{err}").contains("final"));
}

#[test]
fn error_cyclic_inheritance_lists_members() {
    let err = Error::cyclic_inheritance(vec!["app.A".into(), "app.B".into(), "app.A".into()]);
    assert_eq!(format!("{err}"), "cyclic inheritance: app.A -> app.B -> app.A");
}

#[test]
fn error_ambiguous_result() {
    let err = Error::ambiguous_result("self.a, self.b", "2 columns");
    assert!(matches!(err.kind, ErrorKind::AmbiguousResult { .. }));
    assert!(format!("{err}").contains("2 columns"));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_carries_document_position() {
    let sources = SourceMap::new().with("concepts/Person", 3, 5);
    let root = Provenance::new("app", "concepts").with_document(Some("people.yaml".into()));
    let prov = root.child("Person", &sources);
    assert_eq!(prov.position, Some(Position::new(3, 5)));

    let err = Error::unresolved_name("Missing").in_declaration("concept app.Person", &prov);
    let msg = format!("{err}");
    assert!(msg.contains("in concept app.Person"));
    assert!(msg.contains("people.yaml:3:5"));
    assert!(msg.contains("(concepts/Person)"));
}

#[test]
fn nested_declarations_become_frames() {
    let outer = Provenance::new("app", "concepts/Person");
    let inner = Provenance::new("app", "concepts/Person/links/name");
    let result: Result<()> = Err(Error::invalid_constraint("bad"));
    let err = result
        .in_declaration(|| "link name".to_string(), &inner)
        .in_declaration(|| "concept app.Person".to_string(), &outer)
        .unwrap_err();
    let ctx = err.context.unwrap();
    assert_eq!(ctx.declaration.as_deref(), Some("link name"));
    assert_eq!(ctx.stack, vec!["concept app.Person".to_string()]);
}

#[test]
fn explicit_context() {
    let err = Error::internal("oops").with_context(
        ErrorContext::new()
            .with_declaration("atom app.X")
            .with_source("doc")
            .with_position(1, 2),
    );
    assert_eq!(format!("{err}"), "internal error: oops in atom app.X at doc:1:2");
}
