//! Schema model for schemalink.
//!
//! This crate provides:
//! - [`Prototype`] - The five declaration kinds (atoms, concepts, links,
//!   link properties, computables)
//! - [`Constraint`] and [`ConstraintSet`] - Atom and pointer constraints
//! - [`SchemaIndex`] - The persistent name → declaration index
//! - [`Namespace`] - Module-scoped name resolution with import aliases
//! - [`Schema`] - The materialized, read-only schema and its `represent` form

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constraint;
pub mod default;
pub mod index;
pub mod kind;
pub mod mapping;
pub mod namespace;
pub mod proto;
mod represent;
pub mod schema;

pub use constraint::{Constraint, ConstraintKind, ConstraintSet, RoundingMode};
pub use default::DefaultSpec;
pub use index::{Iterate, SchemaIndex};
pub use kind::PrototypeKind;
pub use mapping::{LinkMapping, LinkSearchConfiguration, SearchWeight};
pub use namespace::Namespace;
pub use proto::{
    Atom, AtomAttrs, Computable, Concept, ConceptAttrs, Link, LinkAttrs, LinkProperty,
    PointerMap, PropertyAttrs, Prototype, SourceIndex,
};
pub use schema::Schema;

/// Module holding the engine's builtin declarations.
pub const BUILTIN_MODULE: &str = "builtins";
