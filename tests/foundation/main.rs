//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Name, RawValue, source positions, and Error.

mod errors;
mod names;
mod values;
