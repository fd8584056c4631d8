//! Cross-layer integration tests for schemalink
//!
//! Tests that verify correct interaction between multiple crates.

mod modules;
mod sessions;

use schemalink_foundation::RawValue;

/// Parses a module tree written as JSON.
pub fn tree(json: &str) -> RawValue {
    serde_json::from_str(json).expect("test module is valid JSON")
}
