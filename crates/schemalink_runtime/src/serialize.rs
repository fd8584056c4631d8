//! Schema dumps using `MessagePack`.
//!
//! A dump holds a schema's canonical nested mapping (see
//! [`Schema::represent`]) together with the module it was loaded for. Dumps
//! load back as a [`SchemaDump`] whose `schema` tree can be fed to a loader
//! again.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use schemalink_foundation::{Error, ErrorKind, RawValue, Result};
use schemalink_schema::Schema;
use serde::{Deserialize, Serialize};

/// The serialized form of a schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaDump {
    /// Module the schema was materialized for.
    pub main_module: Option<String>,
    /// Canonical nested mapping of the schema.
    pub schema: RawValue,
}

impl SchemaDump {
    /// Captures the canonical form of `schema`.
    #[must_use]
    pub fn of(schema: &Schema) -> Self {
        Self {
            main_module: schema.main_module().map(str::to_string),
            schema: schema.represent(),
        }
    }
}

/// Serializes a schema to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(schema: &Schema) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&SchemaDump::of(schema))
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a schema dump from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<SchemaDump> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Saves a schema to a file using `MessagePack` format.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(schema: &Schema, path: P) -> Result<()> {
    let path = path.as_ref();
    let io_error = |action: &str, e: std::io::Error| {
        Error::new(ErrorKind::Io(format!(
            "failed to {action} file '{}': {e}",
            path.display()
        )))
    };

    let file = File::create(path).map_err(|e| io_error("create", e))?;
    let mut writer = BufWriter::new(file);
    let bytes = to_bytes(schema)?;
    writer.write_all(&bytes).map_err(|e| io_error("write to", e))?;
    writer.flush().map_err(|e| io_error("flush", e))?;
    Ok(())
}

/// Loads a schema dump from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<SchemaDump> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    from_bytes(&bytes)
}
