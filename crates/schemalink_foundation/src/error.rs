//! Error types for schemalink.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! error raised while processing a declaration is annotated with that
//! declaration's provenance on its way out.

use std::fmt;

use thiserror::Error;

use crate::source::Provenance;

/// Result type used throughout schemalink.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for schemalink operations.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

fn context_suffix(context: &Option<ErrorContext>) -> String {
    context
        .as_ref()
        .map(|ctx| format!(" {ctx}"))
        .unwrap_or_default()
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attributes this error to a declaration.
    ///
    /// The innermost declaration provides the location; outer declarations
    /// are pushed as stack frames.
    #[must_use]
    pub fn in_declaration(mut self, declaration: &str, provenance: &Provenance) -> Self {
        match self.context.take() {
            None => self.context = Some(provenance.context(declaration)),
            Some(ctx) => {
                let ctx = if ctx.declaration.as_deref() == Some(declaration) {
                    ctx
                } else {
                    ctx.with_frame(declaration)
                };
                self.context = Some(ctx);
            }
        }
        self
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl fmt::Display) -> Self {
        Self::new(ErrorKind::DuplicateName(name.to_string()))
    }

    /// Creates an unresolved name error.
    #[must_use]
    pub fn unresolved_name(name: impl fmt::Display) -> Self {
        Self::new(ErrorKind::UnresolvedName(name.to_string()))
    }

    /// Creates an unresolved base error.
    #[must_use]
    pub fn unresolved_base(name: impl fmt::Display, base: impl fmt::Display) -> Self {
        Self::new(ErrorKind::UnresolvedBase {
            name: name.to_string(),
            base: base.to_string(),
        })
    }

    /// Creates a final inheritance error.
    #[must_use]
    pub fn final_inheritance(name: impl fmt::Display, base: impl fmt::Display) -> Self {
        Self::new(ErrorKind::FinalInheritance {
            name: name.to_string(),
            base: base.to_string(),
        })
    }

    /// Creates a cyclic inheritance error from the members of the cycle.
    #[must_use]
    pub fn cyclic_inheritance(cycle: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicInheritance { cycle })
    }

    /// Creates an invalid constraint error.
    #[must_use]
    pub fn invalid_constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConstraint(message.into()))
    }

    /// Creates an invalid declaration error.
    #[must_use]
    pub fn invalid_declaration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDeclaration(message.into()))
    }

    /// Creates an ambiguous result error.
    #[must_use]
    pub fn ambiguous_result(expression: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::AmbiguousResult {
            expression: expression.into(),
            detail: detail.into(),
        })
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A qualified name was registered twice.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// A name did not resolve in any active module.
    #[error("unresolved name: {0}")]
    UnresolvedName(String),

    /// A base did not resolve to a declaration of a compatible kind.
    #[error("{name}: unresolved base {base}")]
    UnresolvedBase {
        /// The declaration naming the base.
        name: String,
        /// The base as written.
        base: String,
    },

    /// A declaration extends a final declaration.
    #[error("{name}: cannot extend final {base}")]
    FinalInheritance {
        /// The extending declaration.
        name: String,
        /// The final base.
        base: String,
    },

    /// The inheritance graph has a cycle.
    #[error("cyclic inheritance: {}", .cycle.join(" -> "))]
    CyclicInheritance {
        /// Members of the cycle, with the first repeated at the end.
        cycle: Vec<String>,
    },

    /// A constraint is malformed or not legal where it is used.
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    /// A computable on a link does not infer a scalar type.
    #[error("computable {name} must be scalar, got {target}")]
    NonScalarComputable {
        /// The computable.
        name: String,
        /// The inferred non-scalar type.
        target: String,
    },

    /// A default query yields a type incompatible with the pointer target.
    #[error("default of {pointer} yields {actual}, expected {expected}")]
    DefaultTypeMismatch {
        /// The pointer owning the default.
        pointer: String,
        /// The pointer target.
        expected: String,
        /// The inferred type.
        actual: String,
    },

    /// An object default query on a pointer whose mapping forbids it.
    #[error("query default of {pointer} is incompatible with mapping {mapping}")]
    IncompatibleDefaultMapping {
        /// The pointer owning the default.
        pointer: String,
        /// The pointer's mapping.
        mapping: String,
    },

    /// An index expression yields a non-atomic column.
    #[error("index expression {expression} must yield atomic values, got {actual}")]
    NonAtomicIndex {
        /// The index expression.
        expression: String,
        /// The offending type.
        actual: String,
    },

    /// An expression does not yield exactly one column of one type.
    #[error("expression {expression} has an ambiguous result: {detail}")]
    AmbiguousResult {
        /// The expression.
        expression: String,
        /// What was found instead.
        detail: String,
    },

    /// A raw declaration has the wrong shape.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// A pointer uses a mapping it may not use.
    #[error("invalid mapping {mapping} for {pointer}")]
    InvalidMapping {
        /// The pointer.
        pointer: String,
        /// The rejected mapping.
        mapping: String,
    },

    /// A pointer name mixes atom and concept targets.
    #[error("pointer target conflict: {0}")]
    PointerTargetConflict(String),

    /// The expression service rejected an expression.
    #[error("error in expression {expression}: {message}")]
    Expression {
        /// The expression text.
        expression: String,
        /// The service's message.
        message: String,
        /// Byte offset into the expression, if known.
        offset: Option<usize>,
    },

    /// Module imports form a cycle.
    #[error("cyclic import: {}", .cycle.join(" -> "))]
    CyclicImport {
        /// The import chain, with the first repeated at the end.
        cycle: Vec<String>,
    },

    /// Schema dump encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading or writing a schema dump failed.
    #[error("io error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The declaration being processed, e.g. `concept app.Person`.
    pub declaration: Option<String>,
    /// Document or module name.
    pub source: Option<String>,
    /// Path of the declaration inside the module tree.
    pub path: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Enclosing declarations, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the declaration path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(decl) = &self.declaration {
            write!(f, "in {decl} ")?;
        }
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if let Some(path) = &self.path {
            write!(f, " ({path})")?;
        }
        for frame in &self.stack {
            write!(f, "\n  in {frame}")?;
        }
        Ok(())
    }
}

/// Extension methods for attaching declaration context to results.
pub trait ResultExt<T> {
    /// Attributes an error to the declaration described by `declaration`.
    ///
    /// # Errors
    ///
    /// Returns the original error, annotated.
    fn in_declaration<F>(self, declaration: F, provenance: &Provenance) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn in_declaration<F>(self, declaration: F, provenance: &Provenance) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.in_declaration(&declaration(), provenance))
    }
}
