//! The builtin module.
//!
//! Loaded before any user module. Every unbased concept, link and link
//! property ultimately extends one of the roots declared here.

use schemalink_foundation::{Name, RawMap, RawValue};
use schemalink_schema::BUILTIN_MODULE;

/// Scalar types every schema can use.
pub const ATOMS: &[&str] = &[
    "bool",
    "bytes",
    "str",
    "int16",
    "int32",
    "int64",
    "float32",
    "float64",
    "decimal",
    "datetime",
    "date",
    "time",
    "timedelta",
    "uuid",
];

const ROOT_LINK: &str = "link";
const ROOT_PROPERTY: &str = "link_property";
const ROOT_CONCEPT: &str = "Object";
const BASE_OBJECT: &str = "BaseObject";

/// Root of every generic link.
#[must_use]
pub fn root_link() -> Name {
    Name::new(BUILTIN_MODULE, ROOT_LINK)
}

/// Root of every generic link property.
#[must_use]
pub fn root_property() -> Name {
    Name::new(BUILTIN_MODULE, ROOT_PROPERTY)
}

/// Default base of concepts.
#[must_use]
pub fn root_concept() -> Name {
    Name::new(BUILTIN_MODULE, ROOT_CONCEPT)
}

/// The one concept with no base at all.
#[must_use]
pub fn base_object() -> Name {
    Name::new(BUILTIN_MODULE, BASE_OBJECT)
}

fn map<const N: usize>(entries: [(&str, RawValue); N]) -> RawValue {
    entries.into_iter().collect()
}

/// The raw tree of the builtin module.
#[must_use]
pub fn module() -> RawValue {
    let atoms: RawMap = ATOMS
        .iter()
        .map(|name| ((*name).to_string(), RawValue::Null))
        .collect();

    let id = map([(
        "uuid",
        map([
            ("required", RawValue::Bool(true)),
            ("readonly", RawValue::Bool(true)),
        ]),
    )]);

    map([
        ("atoms", RawValue::Map(atoms)),
        ("link-properties", map([(ROOT_PROPERTY, RawValue::Null)])),
        ("links", map([(ROOT_LINK, RawValue::Null)])),
        (
            "concepts",
            map([
                (BASE_OBJECT, map([("links", map([("id", id)]))])),
                (ROOT_CONCEPT, map([("extends", RawValue::from(BASE_OBJECT))])),
            ]),
        ),
    ])
}
