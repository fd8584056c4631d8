//! Declaration kinds.

use std::fmt;

/// The kind of a [`Prototype`](crate::Prototype).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrototypeKind {
    /// Scalar type.
    Atom,
    /// Object type.
    Concept,
    /// Typed directed edge.
    Link,
    /// Scalar attribute of a link.
    LinkProperty,
    /// Derived pointer.
    Computable,
}

impl PrototypeKind {
    /// Kinds that appear as top-level sections of a module, in section order.
    pub const SECTIONS: [Self; 4] = [Self::Atom, Self::LinkProperty, Self::Link, Self::Concept];

    /// The module section holding declarations of this kind.
    #[must_use]
    pub fn section(self) -> Option<&'static str> {
        match self {
            Self::Atom => Some("atoms"),
            Self::Concept => Some("concepts"),
            Self::Link => Some("links"),
            Self::LinkProperty => Some("link-properties"),
            Self::Computable => None,
        }
    }

    /// Human-readable label used in diagnostics.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Atom => "atom",
            Self::Concept => "concept",
            Self::Link => "link",
            Self::LinkProperty => "link property",
            Self::Computable => "computable",
        }
    }
}

impl fmt::Display for PrototypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
