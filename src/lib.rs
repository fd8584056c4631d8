//! schemalink - Schema linkage and materialization engine
//!
//! This crate re-exports all layers of the schemalink system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: schemalink_runtime    - Module sessions, MessagePack schema dumps
//! Layer 2: schemalink_resolver   - Intake, linking, linearization, expressions, materialization
//! Layer 1: schemalink_schema     - Prototypes, constraints, namespaces, schema index
//! Layer 0: schemalink_foundation - Core types (Name, RawValue, Error)
//! ```

pub use schemalink_foundation as foundation;
pub use schemalink_resolver as resolver;
pub use schemalink_runtime as runtime;
pub use schemalink_schema as schema;
