//! Module sessions and schema dumps for schemalink.
//!
//! This crate provides:
//! - [`SchemaSession`] - Loads registered modules in import order
//! - [`ModuleRegistry`] - Module sources and import-cycle detection
//! - Schema serialization and deserialization ([`serialize`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod serialize;
pub mod session;

pub use serialize::{SchemaDump, from_bytes, load_from_file, save_to_file, to_bytes};
pub use session::{ModuleRegistry, ModuleSource, SchemaSession};
