//! Integration tests for inheritance linearization and merging

use schemalink_foundation::{ErrorKind, Name, RawValue};
use schemalink_schema::{Constraint, ConstraintKind};

use crate::load;

// =============================================================================
// Errors
// =============================================================================

#[test]
fn final_base_is_rejected() {
    let err = load(
        r#"{"concepts": {
            "Sealed": {"final": true},
            "Child": {"extends": "Sealed"}
        }}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FinalInheritance { .. }));
}

#[test]
fn final_generic_link_rejects_concrete_use() {
    let err = load(
        r#"{
            "links": {"owner": {"final": true}},
            "concepts": {
                "Person": {},
                "Car": {"links": {"owner": "Person"}}
            }
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FinalInheritance { .. }));
}

#[test]
fn final_atom_still_takes_inline_constraints() {
    let schema = load(
        r#"{
            "atoms": {"Code": {"extends": "str", "final": true}},
            "concepts": {"Item": {"links": {"code": {"Code": {"constraints": {"max-length": 8}}}}}}
        }"#,
    )
    .unwrap();
    let code = schema.pointer("Item", "code").unwrap().as_link().unwrap();
    assert_eq!(code.target, Some(Name::new("app", "Item__code")));
}

#[test]
fn two_member_cycle_names_both() {
    let err = load(
        r#"{"concepts": {
            "A": {"extends": "B"},
            "B": {"extends": "A"}
        }}"#,
    )
    .unwrap_err();
    let ErrorKind::CyclicInheritance { cycle } = &err.kind else {
        panic!("expected cyclic inheritance, got {err}");
    };
    assert!(cycle.iter().any(|m| m == "app.A"));
    assert!(cycle.iter().any(|m| m == "app.B"));
    assert_eq!(cycle.first(), cycle.last());
}

#[test]
fn cycle_error_points_at_a_member() {
    let err = load(
        r#"{"concepts": {
            "Z": {},
            "A": {"extends": "B"},
            "B": {"extends": "A"}
        }}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicInheritance { .. }));
    let declaration = err.context.and_then(|c| c.declaration).unwrap();
    assert!(
        declaration == "concept app.A" || declaration == "concept app.B",
        "unexpected declaration {declaration}"
    );
}

#[test]
fn self_cycle_is_rejected() {
    let err = load(r#"{"atoms": {"Loop": {"extends": "Loop"}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicInheritance { .. }));
}

#[test]
fn unresolved_base_names_declaration() {
    let err = load(r#"{"concepts": {"Child": {"extends": "Nowhere"}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedBase { .. }));
    assert_eq!(
        err.context.and_then(|c| c.declaration),
        Some("concept app.Child".to_string())
    );
}

#[test]
fn base_of_wrong_kind_is_unresolved() {
    let err = load(r#"{"concepts": {"Child": {"extends": "str"}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedBase { .. }));
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn left_most_base_wins() {
    let schema = load(
        r#"{"concepts": {
            "B1": {"links": {"x": "str"}},
            "B2": {"links": {"x": "int64"}},
            "C": {"extends": ["B1", "B2"]}
        }}"#,
    )
    .unwrap();
    let x = schema.pointer("C", "x").unwrap().as_link().unwrap();
    assert_eq!(x.source, Some(Name::new("app", "B1")));
    assert_eq!(x.target, Some(Name::new("builtins", "str")));
}

#[test]
fn atom_constraints_accumulate() {
    let schema = load(
        r#"{"atoms": {
            "PosInt": {"extends": "int64", "constraints": [{"min-value": 0}]},
            "Percent": {"extends": "PosInt", "constraints": [{"max-value": 100}]}
        }}"#,
    )
    .unwrap();
    let percent = schema.atom("Percent").unwrap();
    assert_eq!(percent.constraints.len(), 2);
    assert_eq!(
        percent.constraints.get(ConstraintKind::MinValue),
        Some(&Constraint::MinValue(RawValue::Int(0)))
    );
    assert_eq!(
        percent.constraints.get(ConstraintKind::MaxValue),
        Some(&Constraint::MaxValue(RawValue::Int(100)))
    );
    assert_eq!(schema.atom("PosInt").unwrap().constraints.len(), 1);
}

#[test]
fn child_constraint_overrides_base() {
    let schema = load(
        r#"{"atoms": {
            "Short": {"extends": "str", "constraints": {"max-length": 100}},
            "Shorter": {"extends": "Short", "constraints": {"max-length": 10}}
        }}"#,
    )
    .unwrap();
    assert_eq!(
        schema.atom("Shorter").unwrap().constraints.get(ConstraintKind::MaxLength),
        Some(&Constraint::MaxLength(10))
    );
}

#[test]
fn override_does_not_leak_into_base() {
    let schema = load(
        r#"{"concepts": {
            "Person": {"links": {"name": {"str": {"required": true}}}},
            "Employee": {"extends": "Person", "links": {"name": {"str": {"required": false}}}}
        }}"#,
    )
    .unwrap();
    let employee = schema.pointer("Employee", "name").unwrap().as_link().unwrap();
    let person = schema.pointer("Person", "name").unwrap().as_link().unwrap();
    assert!(!employee.is_required());
    assert!(person.is_required());
}

#[test]
fn inherited_attributes_fill_unset_ones() {
    let schema = load(
        r#"{
            "atoms": {
                "Label": {"extends": "str", "title": "Label", "default": "none"},
                "Tag": {"extends": "Label"}
            }
        }"#,
    )
    .unwrap();
    let tag = schema.atom("Tag").unwrap();
    assert_eq!(tag.attrs.title.as_deref(), Some("Label"));
    assert!(tag.own.title.is_none());
}

#[test]
fn abstract_and_final_are_not_inherited() {
    let schema = load(
        r#"{"concepts": {
            "Shape": {"abstract": true},
            "Circle": {"extends": "Shape"}
        }}"#,
    )
    .unwrap();
    assert!(schema.concept("Shape").unwrap().is_abstract());
    assert!(!schema.concept("Circle").unwrap().is_abstract());
}

#[test]
fn pointers_union_across_bases() {
    let schema = load(
        r#"{"concepts": {
            "Named": {"links": {"name": "str"}},
            "Aged": {"links": {"age": "int64"}},
            "Person": {"extends": ["Named", "Aged"], "links": {"email": "str"}}
        }}"#,
    )
    .unwrap();
    for pointer in ["name", "age", "email", "id"] {
        assert!(schema.pointer("Person", pointer).is_ok(), "missing {pointer}");
    }
}
