//! Integration tests for computables, query defaults, and index expressions

use schemalink_foundation::{ErrorKind, Name};
use schemalink_resolver::LoaderConfig;
use schemalink_schema::DefaultSpec;

use crate::{load, load_with};

fn people(extra_links: &str, computables: &str) -> String {
    format!(
        r#"{{"concepts": {{"Person": {{
            "links": {{"name": "str", "friend": {{"Person": {{"mapping": "**"}}}}{extra_links}}},
            "computables": {{{computables}}}
        }}}}}}"#
    )
}

// =============================================================================
// Computables
// =============================================================================

#[test]
fn computable_infers_a_single_type() {
    let schema = load(&people(
        "",
        r#""reach": "count(self.friend) + count(self.friend.friend)""#,
    ))
    .unwrap();
    let reach = schema.pointer("Person", "reach").unwrap().as_computable().unwrap();
    assert_eq!(reach.target, Some(Name::new("builtins", "int64")));
    assert_eq!(reach.is_atom, Some(true));
    assert_eq!(
        reach.resolved.as_deref(),
        Some("count(self.friend) + count(self.friend.friend)")
    );
    assert_eq!(reach.bases, vec![Name::new("app", "reach")]);
}

#[test]
fn local_computable_only_reads_its_source() {
    let schema = load(&people("", r#""shout": "upper(self.name)""#)).unwrap();
    let shout = schema.pointer("Person", "shout").unwrap().as_computable().unwrap();
    assert!(shout.is_local);
    assert_eq!(shout.target, Some(Name::new("builtins", "str")));

    let generic = schema.index().link(&Name::new("app", "shout")).unwrap();
    assert!(generic.implicit);
    assert_eq!(generic.is_atom, Some(true));
}

#[test]
fn computables_may_build_on_each_other() {
    let schema = load(&people(
        "",
        r#""shout": "upper(self.label)", "label": "lower(self.name)""#,
    ))
    .unwrap();
    let shout = schema.pointer("Person", "shout").unwrap().as_computable().unwrap();
    assert_eq!(shout.target, Some(Name::new("builtins", "str")));
}

#[test]
fn computable_with_two_columns_is_ambiguous() {
    let err = load(&people("", r#""pair": "self.name, self.friend""#)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AmbiguousResult { .. }));
}

#[test]
fn link_computable_must_be_scalar() {
    let err = load(
        r#"{
            "links": {"knows": {"computables": {"anyone": "Person"}}},
            "concepts": {"Person": {}}
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NonScalarComputable { .. }));
}

#[test]
fn syntax_errors_carry_an_offset() {
    let err = load(&people("", r#""broken": "self.name +""#)).unwrap_err();
    let ErrorKind::Expression {
        expression, offset, ..
    } = &err.kind
    else {
        panic!("expected an expression error, got {err}");
    };
    assert_eq!(expression, "self.name +");
    assert_eq!(*offset, Some(11));
}

#[test]
fn unknown_pointer_in_computable_fails() {
    let err = load(&people("", r#""bad": "self.nickname""#)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Expression { .. }));
}

// =============================================================================
// Query Defaults
// =============================================================================

#[test]
fn query_default_must_match_target() {
    let err = load(&people(
        r#", "title": {"str": {"default": {"query": "1 + 2"}}}"#,
        "",
    ))
    .unwrap_err();
    let ErrorKind::DefaultTypeMismatch { expected, actual, .. } = &err.kind else {
        panic!("expected a default type mismatch, got {err}");
    };
    assert_eq!(expected, "builtins.str");
    assert_eq!(actual, "builtins.int64");
}

#[test]
fn object_query_default_needs_a_multi_target_mapping() {
    let err = load(&people(
        r#", "best": {"Person": {"mapping": "11", "default": {"query": "Person"}}}"#,
        "",
    ))
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IncompatibleDefaultMapping { .. }));

    let schema = load(&people(
        r#", "best": {"Person": {"mapping": "**", "default": {"query": "Person"}}}"#,
        "",
    ))
    .unwrap();
    let best = schema.pointer("Person", "best").unwrap().as_link().unwrap();
    let defaults = best.attrs.default.as_deref().unwrap();
    assert_eq!(
        defaults,
        [DefaultSpec::Query {
            text: "Person".to_string(),
            resolved: Some("app::Person".to_string()),
        }]
    );
}

#[test]
fn literal_defaults_are_not_type_checked() {
    let schema = load(&people(r#", "rank": {"int64": {"default": 5}}"#, "")).unwrap();
    let rank = schema.pointer("Person", "rank").unwrap().as_link().unwrap();
    assert_eq!(rank.attrs.default.as_ref().map(Vec::len), Some(1));
}

// =============================================================================
// Indexes
// =============================================================================

#[test]
fn index_expressions_are_canonicalized() {
    let schema = load(
        r#"{"concepts": {"Person": {"links": {"name": "str"}, "indexes": ["lower(self.name)"]}}}"#,
    )
    .unwrap();
    let person = schema.concept("Person").unwrap();
    assert_eq!(person.indexes.len(), 1);
    assert_eq!(person.indexes[0].resolved.as_deref(), Some("lower(self.name)"));
}

#[test]
fn non_atomic_index_is_rejected_unless_lenient() {
    let module = people("", "").replace(
        r#""computables""#,
        r#""indexes": ["self.friend"], "computables""#,
    );
    let err = load(&module).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NonAtomicIndex { .. }));

    assert!(load_with(LoaderConfig::lenient(), &module).is_ok());
}
