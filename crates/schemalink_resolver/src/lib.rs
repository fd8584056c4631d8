//! Schema linkage and materialization for schemalink.
//!
//! This crate provides:
//! - [`SchemaLoader`] - Loads modules into a global index and materializes
//!   schemas
//! - [`read_module`] - Declaration intake (raw tree → typed declarations)
//! - [`ExpressionService`] - The seam to an expression language, with a
//!   small reference implementation in [`PathExpressionService`]
//! - [`LoaderConfig`] and [`ImportContext`] - Loader and per-load settings
//!
//! # Pipeline
//!
//! ```text
//! intake → link (register, resolve bases, specialize) → linearize
//!        → [top-level only] order (expressions, pointer checks) → materialize
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtins;
pub mod config;
pub mod context;
pub mod expr;
pub mod intake;
mod linearize;
mod linker;
pub mod loader;
mod materialize;
mod order;
mod specialize;

pub use config::LoaderConfig;
pub use context::ImportContext;
pub use expr::{
    ExprContext, ExprError, ExprTree, ExpressionResolver, ExpressionService,
    PathExpressionService, ResolvedComputable, ResultColumn,
};
pub use intake::{RawModule, read_module};
pub use loader::SchemaLoader;
