//! Integration tests for raw document values
//!
//! Tests accessors, ordering, and the serde mapping used to feed documents
//! to the engine.

use schemalink_foundation::{RawMap, RawValue};

#[test]
fn json_objects_keep_document_order() {
    let value: RawValue = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let keys: Vec<&str> = value.as_map().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn json_scalars_map_to_variants() {
    let value: RawValue =
        serde_json::from_str(r#"[null, true, 7, 2.5, "s", [], {}]"#).unwrap();
    let items = value.as_list().unwrap();
    assert_eq!(items[0], RawValue::Null);
    assert_eq!(items[1], RawValue::Bool(true));
    assert_eq!(items[2], RawValue::Int(7));
    assert_eq!(items[3], RawValue::Float(2.5));
    assert_eq!(items[4], RawValue::from("s"));
    assert_eq!(items[5], RawValue::List(Vec::new()));
    assert_eq!(items[6], RawValue::Map(RawMap::new()));
}

#[test]
fn serialize_back_to_json() {
    let value: RawValue = [("a", RawValue::Int(1)), ("b", RawValue::from("x"))]
        .into_iter()
        .collect();
    assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":1,"b":"x"}"#);
}

#[test]
fn accessors() {
    assert_eq!(RawValue::Int(3).as_int(), Some(3));
    assert_eq!(RawValue::Bool(false).as_bool(), Some(false));
    assert!(RawValue::Null.is_null());
    assert!(RawValue::Float(1.0).is_number());
    assert!(RawValue::from("x").is_scalar());
    assert!(!RawValue::map().is_scalar());
    assert_eq!(RawValue::from("x").type_name(), RawValue::from("y").type_name());
}

#[test]
fn to_list_wraps_scalars() {
    assert_eq!(RawValue::from("A").to_list(), vec![RawValue::from("A")]);
    assert!(RawValue::Null.to_list().is_empty());
}
