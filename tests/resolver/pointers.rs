//! Integration tests for pointer specialization and pointer checks

use schemalink_foundation::{ErrorKind, Name, RawValue};
use schemalink_schema::{Constraint, ConstraintKind, LinkMapping, PrototypeKind};

use crate::load;

// =============================================================================
// Specialization
// =============================================================================

#[test]
fn specialization_name_is_derived_from_triple() {
    let schema = load(r#"{"concepts": {"Person": {"links": {"friend": "Person"}}}}"#).unwrap();
    let friend = schema.pointer("Person", "friend").unwrap().as_link().unwrap();
    let person = Name::new("app", "Person");
    let pointer = Name::new("app", "friend");
    assert_eq!(friend.name, Name::specialized(&person, &pointer, Some(&person)));
    assert_eq!(friend.bases, vec![pointer]);
    assert_eq!(friend.normal_name(), &Name::new("app", "friend"));
}

#[test]
fn undeclared_pointer_creates_hidden_generic() {
    let schema = load(r#"{"concepts": {"Person": {"links": {"nick": "str"}}}}"#).unwrap();
    let generic = schema.index().link(&Name::new("app", "nick")).unwrap();
    assert!(generic.implicit);
    assert!(generic.is_generic());
    assert_eq!(generic.bases, vec![Name::new("builtins", "link")]);
}

#[test]
fn declared_generic_link_is_reused() {
    let schema = load(
        r#"{
            "links": {"owner": {"title": "Owner", "mapping": "**"}},
            "concepts": {"Car": {"links": {"owner": "Person"}}, "Person": {}}
        }"#,
    )
    .unwrap();
    let owner = schema.pointer("Car", "owner").unwrap().as_link().unwrap();
    assert_eq!(owner.bases, vec![Name::new("app", "owner")]);
    assert_eq!(owner.mapping(), LinkMapping::ManyToMany);
    assert_eq!(owner.attrs.title.as_deref(), Some("Owner"));
}

#[test]
fn one_pointer_may_target_several_concepts() {
    let schema = load(
        r#"{"concepts": {
            "Cat": {}, "Dog": {},
            "Owner": {"links": {"pet": ["Cat", "Dog"]}}
        }}"#,
    )
    .unwrap();
    let pets = schema.pointer_set("Owner", "pet").unwrap();
    assert_eq!(pets.len(), 2);
}

// =============================================================================
// Automatic Atoms
// =============================================================================

#[test]
fn inline_atom_constraints_generate_hidden_atom() {
    let schema = load(
        r#"{"concepts": {"Person": {"links": {"name": {"str": {"constraints": {"max-length": 64}}}}}}}"#,
    )
    .unwrap();
    let name = schema.pointer("Person", "name").unwrap().as_link().unwrap();
    let generated = Name::new("app", "Person__name");
    assert_eq!(name.target, Some(generated.clone()));

    let atom = schema.index().atom(&generated).unwrap();
    assert!(atom.automatic);
    assert_eq!(atom.base, Some(Name::new("builtins", "str")));
    assert_eq!(
        atom.constraints.get(ConstraintKind::MaxLength),
        Some(&Constraint::MaxLength(64))
    );
    assert_eq!(schema.iterate(Some(PrototypeKind::Atom), false, false).count(), 0);
    assert_eq!(schema.iterate(Some(PrototypeKind::Atom), false, true).count(), 1);
}

#[test]
fn generated_atom_name_may_not_be_taken() {
    let err = load(
        r#"{
            "atoms": {"Person__name": {"extends": "int64"}},
            "concepts": {"Person": {"links": {"name": {"str": {"constraints": {"max-length": 5}}}}}}
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(_)));
}

#[test]
fn two_constrained_targets_collide() {
    let err = load(
        r#"{"concepts": {"Person": {"links": {"name": {
            "str": {"constraints": {"max-length": 5}},
            "bytes": {"constraints": {"max-length": 3}}
        }}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(_)));
}

#[test]
fn atom_constraints_on_concept_target_are_rejected() {
    let err = load(
        r#"{"concepts": {"Person": {"links": {"friend": {"Person": {"constraints": {"max-length": 3}}}}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));
}

// =============================================================================
// Constraints
// =============================================================================

#[test]
fn unique_on_atomic_link_takes_a_value() {
    let schema = load(
        r#"{"concepts": {"User": {"links": {"email": {"str": {"constraints": {"unique": true}}}}}}}"#,
    )
    .unwrap();
    let email = schema.pointer("User", "email").unwrap().as_link().unwrap();
    assert_eq!(
        email.constraints.get(ConstraintKind::Unique),
        Some(&Constraint::Unique(RawValue::Bool(true)))
    );

    let err = load(
        r#"{"concepts": {"User": {"links": {"email": {"str": {"constraints": {"unique": "self.email"}}}}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));
}

#[test]
fn abstract_constraints_apply_to_descendants_only() {
    let schema = load(
        r#"{
            "links": {"code": {"abstract-constraints": {"unique": true}}},
            "concepts": {"Item": {"links": {"code": "str"}}}
        }"#,
    )
    .unwrap();
    let generic = schema.index().link(&Name::new("app", "code")).unwrap();
    assert!(!generic.constraints.contains(ConstraintKind::Unique));
    let code = schema.pointer("Item", "code").unwrap().as_link().unwrap();
    assert!(code.constraints.contains(ConstraintKind::Unique));
    assert!(code.abstract_constraints.contains(ConstraintKind::Unique));
}

#[test]
fn abstract_unique_is_checked_like_unique() {
    let err = load(
        r#"{"concepts": {"User": {"links": {"email": {"str": {"abstract-constraints": {"unique": "self.email"}}}}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));

    let err = load(
        r#"{"links": {"code": {"abstract-constraints": {"unique": ["a", "b"]}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidConstraint(_)));
}

// =============================================================================
// Pointer Checks
// =============================================================================

#[test]
fn atomic_link_must_be_one_to_one() {
    let err = load(r#"{"concepts": {"Person": {"links": {"tags": {"str": {"mapping": "**"}}}}}}"#)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidMapping { .. }));
}

#[test]
fn pointer_cannot_mix_atom_and_concept_targets() {
    let err = load(
        r#"{"concepts": {
            "A": {"links": {"ref": "str"}},
            "B": {"links": {"ref": "A"}}
        }}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PointerTargetConflict(_)));

    let err = load(r#"{"concepts": {"A": {"links": {"ref": ["str", "A"]}}}}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PointerTargetConflict(_)));
}

// =============================================================================
// Link Properties
// =============================================================================

#[test]
fn generic_link_declares_properties_for_its_uses() {
    let schema = load(
        r#"{
            "links": {"knows": {"mapping": "**", "properties": {"since": "datetime"}}},
            "concepts": {
                "Person": {"links": {"knows": {"Person": {"properties": {"since": {"datetime": {"readonly": true}}}}}}}
            }
        }"#,
    )
    .unwrap();
    let knows = schema.pointer("Person", "knows").unwrap().as_link().unwrap();
    let since = Name::new("app", "since");
    assert!(knows.own_pointers.contains_key(&since));

    let decl = &knows.own_pointers[&since][0];
    let prop = schema.index().link_property(decl).unwrap();
    assert_eq!(prop.source.as_ref(), Some(&knows.name));
    assert!(prop.is_readonly());
}

#[test]
fn specialized_link_cannot_invent_properties() {
    let err = load(
        r#"{"concepts": {"Person": {"links": {"knows": {"Person": {"properties": {"since": "datetime"}}}}}}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedName(_)));
}

#[test]
fn property_target_must_be_an_atom() {
    let err = load(
        r#"{
            "links": {"knows": {"properties": {"via": "Person"}}},
            "concepts": {"Person": {}}
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedName(_)));
}

#[test]
fn duplicate_computable_and_link_name() {
    let err = load(
        r#"{"concepts": {"Person": {
            "links": {"name": "str"},
            "computables": {"name": "upper(self.name)"}
        }}}"#,
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(_)));
}
