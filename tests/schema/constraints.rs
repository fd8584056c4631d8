//! Integration tests for constraint parsing and constraint sets

use schemalink_foundation::{ErrorKind, RawValue};
use schemalink_schema::{Constraint, ConstraintKind, ConstraintSet, DefaultSpec, RoundingMode};

fn raw(json: &str) -> RawValue {
    serde_json::from_str(json).unwrap()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn list_and_map_forms_agree() {
    let from_list = Constraint::list_from_raw(&raw(r#"[{"min-value": 0}, {"max-length": 10}]"#)).unwrap();
    let from_map = Constraint::list_from_raw(&raw(r#"{"min-value": 0, "max-length": 10}"#)).unwrap();
    assert_eq!(from_list, from_map);
    assert_eq!(from_list[0], Constraint::MinValue(RawValue::Int(0)));
    assert_eq!(from_list[1], Constraint::MaxLength(10));
}

#[test]
fn precision_with_scale() {
    let c = Constraint::from_entry("precision", &raw("[10, 2]")).unwrap();
    assert_eq!(
        c,
        Constraint::Precision {
            precision: 10,
            scale: Some(2)
        }
    );
}

#[test]
fn precision_scale_must_be_smaller() {
    let err = Constraint::from_entry("precision", &raw("[4, 4]")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));
}

#[test]
fn every_rounding_mode_parses() {
    for name in ["ceiling", "down", "floor", "half-down", "half-even", "half-up", "up", "05up"] {
        let c = Constraint::from_entry("rounding", &RawValue::from(name)).unwrap();
        assert!(matches!(c, Constraint::Rounding(_)));
    }
    assert_eq!(RoundingMode::parse("05up"), Some(RoundingMode::ZeroFiveUp));
    assert!(Constraint::from_entry("rounding", &RawValue::from("sideways")).is_err());
}

#[test]
fn regexp_must_compile() {
    assert!(Constraint::from_entry("regexp", &RawValue::from("^[a-z]+$")).is_ok());
    let err = Constraint::from_entry("regexp", &RawValue::from("([a-z")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));
}

#[test]
fn unknown_key_is_rejected() {
    let err = Constraint::from_entry("max-width", &RawValue::Int(3)).unwrap_err();
    assert!(format!("{err}").contains("max-width"));
}

#[test]
fn negative_length_is_rejected() {
    assert!(Constraint::from_entry("min-length", &RawValue::Int(-1)).is_err());
}

#[test]
fn unique_is_a_pointer_constraint() {
    let c = Constraint::from_entry("unique", &RawValue::Bool(true)).unwrap();
    assert!(!c.is_atom_constraint());
    assert!(Constraint::MinLength(1).is_atom_constraint());
}

// =============================================================================
// Sets
// =============================================================================

#[test]
fn add_replaces_same_kind() {
    let mut set = ConstraintSet::new();
    set.add(Constraint::MaxValue(RawValue::Int(10)));
    set.add(Constraint::MaxValue(RawValue::Int(5)));
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.get(ConstraintKind::MaxValue),
        Some(&Constraint::MaxValue(RawValue::Int(5)))
    );
}

#[test]
fn inherit_only_fills_missing_kinds() {
    let mut child: ConstraintSet = [Constraint::MaxValue(RawValue::Int(100))].into_iter().collect();
    let base: ConstraintSet = [
        Constraint::MinValue(RawValue::Int(0)),
        Constraint::MaxValue(RawValue::Int(1_000)),
    ]
    .into_iter()
    .collect();
    child.inherit(&base);
    assert_eq!(child.len(), 2);
    assert_eq!(
        child.get(ConstraintKind::MaxValue),
        Some(&Constraint::MaxValue(RawValue::Int(100)))
    );
    assert!(child.contains(ConstraintKind::MinValue));
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn defaults_mix_literals_and_queries() {
    let defaults = DefaultSpec::list_from_raw(&raw(r#"[1, {"query": "count(app::Person)"}]"#));
    assert_eq!(defaults[0], DefaultSpec::Literal(RawValue::Int(1)));
    assert!(defaults[1].is_query());
    assert_eq!(DefaultSpec::list_to_raw(&defaults), raw(r#"[1, {"query": "count(app::Person)"}]"#));
}

#[test]
fn single_default_collapses() {
    let defaults = DefaultSpec::list_from_raw(&RawValue::from("n/a"));
    assert_eq!(defaults.len(), 1);
    assert_eq!(DefaultSpec::list_to_raw(&defaults), RawValue::from("n/a"));
}
