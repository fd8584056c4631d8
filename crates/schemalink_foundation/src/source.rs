//! Source location tracking.
//!
//! The engine never sees source text. The document parser may hand over a
//! [`SourceMap`] from declaration paths (`concepts/Person/links/name`) to
//! positions; intake stamps each declaration with a [`Provenance`] so errors
//! can point back at the document.

use std::collections::HashMap;

use crate::error::ErrorContext;

/// A 1-based line/column position in a schema document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Positions of declarations within one document, keyed by declaration path.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    positions: HashMap<String, Position>,
}

impl SourceMap {
    /// Creates an empty source map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the position of the declaration at `path`.
    pub fn insert(&mut self, path: impl Into<String>, position: Position) {
        self.positions.insert(path.into(), position);
    }

    /// Builder form of [`SourceMap::insert`].
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, line: u32, column: u32) -> Self {
        self.insert(path, Position::new(line, column));
        self
    }

    /// Returns the position recorded for `path`.
    #[must_use]
    pub fn position(&self, path: &str) -> Option<Position> {
        self.positions.get(path).copied()
    }
}

/// Where a declaration was defined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Module the declaration was read from.
    pub module: String,
    /// Document name, if the caller supplied one.
    pub document: Option<String>,
    /// Slash-separated path inside the module tree.
    pub path: String,
    /// Position in the document, if known.
    pub position: Option<Position>,
}

impl Provenance {
    /// Creates a provenance for a declaration at `path` in `module`.
    #[must_use]
    pub fn new(module: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            document: None,
            path: path.into(),
            position: None,
        }
    }

    /// Provenance for declarations synthesized by the engine itself.
    #[must_use]
    pub fn synthesized(module: impl Into<String>) -> Self {
        Self::new(module, "<generated>")
    }

    /// Sets the document name.
    #[must_use]
    pub fn with_document(mut self, document: Option<String>) -> Self {
        self.document = document;
        self
    }

    /// Sets the position.
    #[must_use]
    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }

    /// Derives the provenance of a nested declaration.
    ///
    /// The position is looked up again in `sources`; a nested declaration
    /// with no recorded position falls back to its parent's.
    #[must_use]
    pub fn child(&self, segment: &str, sources: &SourceMap) -> Self {
        let path = format!("{}/{segment}", self.path);
        let position = sources.position(&path).or(self.position);
        Self {
            module: self.module.clone(),
            document: self.document.clone(),
            path,
            position,
        }
    }

    /// Builds an error context pointing at this declaration.
    #[must_use]
    pub fn context(&self, declaration: &str) -> ErrorContext {
        let mut context = ErrorContext::new()
            .with_declaration(declaration)
            .with_source(self.document.clone().unwrap_or_else(|| self.module.clone()))
            .with_path(self.path.clone());
        if let Some(pos) = self.position {
            context = context.with_position(pos.line as usize, pos.column as usize);
        }
        context
    }
}
