//! Embedded expressions.
//!
//! The engine never evaluates expressions. It hands them to an
//! [`ExpressionService`] that normalizes the text against the schema being
//! built and reports the result columns and the sources the expression
//! walks. [`ExpressionResolver`] applies the computable, default and index
//! policies on top of that.

mod path;
mod resolver;

pub use path::PathExpressionService;
pub use resolver::{ExpressionResolver, ResolvedComputable};

use indexmap::IndexMap;
use schemalink_foundation::Name;
use schemalink_schema::{Namespace, SchemaIndex};
use thiserror::Error;

/// Normalizes expressions against a schema.
pub trait ExpressionService {
    /// Parses and type-checks `expr`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExprError`] if the text does not parse or refers to
    /// something the context cannot resolve.
    fn normalize(&self, expr: &str, ctx: &ExprContext<'_>) -> Result<ExprTree, ExprError>;
}

/// What an expression may refer to.
#[derive(Clone, Debug)]
pub struct ExprContext<'a> {
    /// The schema being built.
    pub index: &'a SchemaIndex,
    /// The declaring module's namespace, for aliases.
    pub namespace: &'a Namespace,
    /// Anchor names bound to sources, e.g. `self`.
    pub anchors: IndexMap<String, Name>,
}

impl<'a> ExprContext<'a> {
    /// Creates a context with no anchors.
    #[must_use]
    pub fn new(index: &'a SchemaIndex, namespace: &'a Namespace) -> Self {
        Self {
            index,
            namespace,
            anchors: IndexMap::new(),
        }
    }

    /// Binds an anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>, source: Name) -> Self {
        self.anchors.insert(anchor.into(), source);
        self
    }
}

/// A normalized expression.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprTree {
    /// Canonical text with every name fully qualified.
    pub text: String,
    /// Result columns.
    pub columns: Vec<ResultColumn>,
    /// Sources the expression steps from, one entry per path step.
    pub references: Vec<Name>,
}

/// One result column and its candidate types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultColumn {
    /// Candidate types.
    pub types: Vec<Name>,
}

/// A failure reported by an expression service.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    /// The text does not parse.
    #[error("{message}")]
    Syntax {
        /// What went wrong.
        message: String,
        /// Byte offset into the text.
        offset: usize,
    },

    /// A name or pointer does not resolve.
    #[error("{0}")]
    Unresolved(String),

    /// The expression walks through a computable whose type is not known yet.
    #[error("depends on unresolved computable {0}")]
    Pending(Name),
}

impl ExprError {
    /// Byte offset of the failure, if known.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
