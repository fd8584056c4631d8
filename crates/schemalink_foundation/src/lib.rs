//! Core types shared by every schemalink layer.
//!
//! This crate provides:
//! - [`Name`] - Qualified declaration names (`module.name`)
//! - [`RawValue`] - The parsed nested-mapping form of schema documents
//! - [`Provenance`] and [`SourceMap`] - Where a declaration came from
//! - [`Error`] - Rich error types with declaration context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod name;
pub mod source;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result, ResultExt};
pub use name::Name;
pub use source::{Position, Provenance, SourceMap};
pub use value::{RawMap, RawValue};
