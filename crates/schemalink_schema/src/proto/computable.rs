//! Computed pointers.

use schemalink_foundation::{Name, Provenance};

/// A pointer whose value is derived from an expression.
#[derive(Clone, Debug)]
pub struct Computable {
    /// Qualified name.
    pub name: Name,
    /// The generic pointer, set once the expression is resolved.
    pub bases: Vec<Name>,
    /// Owning concept or link.
    pub source: Name,
    /// Generic pointer name the computable is declared under.
    pub pointer: Name,
    /// The expression as written.
    pub expression: String,
    /// Canonical expression text, once resolved.
    pub resolved: Option<String>,
    /// Inferred result type, once resolved.
    pub target: Option<Name>,
    /// True if the expression only reads its own source.
    pub is_local: bool,
    /// Whether the result type is an atom, once resolved.
    pub is_atom: Option<bool>,
    /// Title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Where the computable was declared.
    pub provenance: Provenance,
}

impl Computable {
    /// Creates an unresolved computable named after `(source, pointer)`.
    #[must_use]
    pub fn new(
        source: &Name,
        pointer: &Name,
        expression: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            name: Name::specialized(source, pointer, None),
            bases: Vec::new(),
            source: source.clone(),
            pointer: pointer.clone(),
            expression: expression.into(),
            resolved: None,
            target: None,
            is_local: false,
            is_atom: None,
            title: None,
            description: None,
            provenance,
        }
    }

    /// Returns true once the expression has been type-checked.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}
