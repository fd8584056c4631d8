//! Integration tests for Layer 2: Resolver
//!
//! Tests for intake, inheritance, pointer specialization, and expression
//! resolution, driven through the schema loader.

mod expressions;
mod inheritance;
mod intake;
mod pointers;

use schemalink_foundation::{Error, RawValue, Result};
use schemalink_resolver::{ImportContext, LoaderConfig, SchemaLoader};
use schemalink_schema::Schema;

/// Parses a module tree written as JSON.
pub fn tree(json: &str) -> RawValue {
    serde_json::from_str(json).expect("test module is valid JSON")
}

/// Loads `json` as the top-level module `app`.
pub fn load(json: &str) -> Result<Schema> {
    load_with(LoaderConfig::default(), json)
}

/// Loads `json` as the top-level module `app` with `config`.
pub fn load_with(config: LoaderConfig, json: &str) -> Result<Schema> {
    let mut loader = SchemaLoader::with_config(config)?;
    loader
        .load_module(&ImportContext::new("app"), &tree(json))?
        .ok_or_else(|| Error::internal("top-level load produced no schema"))
}
