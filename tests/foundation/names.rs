//! Integration tests for qualified names
//!
//! Tests parsing, display, and the derived names of specializations and
//! automatic atoms.

use proptest::prelude::*;
use schemalink_foundation::Name;

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parse_qualified() {
    let name = Name::parse("app.Person").unwrap();
    assert_eq!(name.module(), "app");
    assert_eq!(name.name(), "Person");
}

#[test]
fn parse_dotted_module() {
    let name = Name::parse("acme.people.Person").unwrap();
    assert_eq!(name.module(), "acme.people");
    assert_eq!(name, Name::new("acme.people", "Person"));
}

#[test]
fn parse_rejects_unqualified() {
    assert!(Name::parse("Person").is_none());
    assert!(Name::parse(".Person").is_none());
    assert!(Name::parse("app.").is_none());
    assert!(!Name::is_qualified("Person"));
    assert!(Name::is_qualified("app.Person"));
}

// =============================================================================
// Derived Names
// =============================================================================

#[test]
fn specialization_lives_in_pointer_module() {
    let source = Name::new("app", "Person");
    let pointer = Name::new("lib", "name");
    let target = Name::new("builtins", "str");
    let spec = Name::specialized(&source, &pointer, Some(&target));
    assert_eq!(spec.module(), "lib");
    assert!(spec.is_specialized());
    assert!(!spec.name().contains('.'));
    assert_eq!(Name::parse(&spec.to_string()), Some(spec));
}

#[test]
fn specialization_distinguishes_targets() {
    let source = Name::new("app", "Person");
    let pointer = Name::new("app", "friend");
    let a = Name::specialized(&source, &pointer, Some(&Name::new("app", "Person")));
    let b = Name::specialized(&source, &pointer, Some(&Name::new("app", "Robot")));
    assert_ne!(a, b);
}

#[test]
fn generated_atom_name() {
    let host = Name::new("app", "Person");
    let atom = Name::generated(&host, "name");
    assert_eq!(atom.to_string(), "app.Person__name");
    assert!(!atom.is_specialized());
}

// =============================================================================
// Property Tests
// =============================================================================

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn module() -> impl Strategy<Value = String> {
    prop::collection::vec(ident(), 1..3).prop_map(|parts| parts.join("."))
}

fn name() -> impl Strategy<Value = Name> {
    (module(), ident()).prop_map(|(m, n)| Name::new(m, n))
}

proptest! {
    #[test]
    fn specialized_is_a_pure_function(source in name(), pointer in name(), target in name()) {
        let a = Name::specialized(&source, &pointer, Some(&target));
        let b = Name::specialized(&source.clone(), &pointer.clone(), Some(&target.clone()));
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(Name::parse(&a.to_string()), Some(a));
    }

    #[test]
    fn display_parse_roundtrip(n in name()) {
        prop_assert_eq!(Name::parse(&n.to_string()), Some(n));
    }
}
