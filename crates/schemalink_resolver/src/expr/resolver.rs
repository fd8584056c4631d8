//! Computable, default and index policies over an [`ExpressionService`].

use schemalink_foundation::{Error, ErrorKind, Name, Result};
use schemalink_schema::{LinkMapping, Namespace, PrototypeKind, SchemaIndex};
use tracing::trace;

use super::{ExprContext, ExprTree, ExpressionService};

/// Result of type-checking a computable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedComputable {
    /// Canonical expression text.
    pub text: String,
    /// The single inferred type.
    pub target: Name,
    /// True if the inferred type is an atom.
    pub is_atom: bool,
    /// True if the expression only steps from its own source.
    pub is_local: bool,
}

/// Applies expression policies on behalf of one declaring module.
pub struct ExpressionResolver<'a, S: ?Sized> {
    service: &'a S,
    index: &'a SchemaIndex,
    namespace: &'a Namespace,
    require_atomic_indexes: bool,
}

impl<'a, S: ExpressionService + ?Sized> ExpressionResolver<'a, S> {
    /// Creates a resolver over `index` as seen from `namespace`.
    #[must_use]
    pub fn new(service: &'a S, index: &'a SchemaIndex, namespace: &'a Namespace) -> Self {
        Self {
            service,
            index,
            namespace,
            require_atomic_indexes: true,
        }
    }

    /// Sets whether index expressions must yield atoms.
    #[must_use]
    pub fn with_atomic_indexes(mut self, require: bool) -> Self {
        self.require_atomic_indexes = require;
        self
    }

    fn normalize(&self, expr: &str, anchor: Option<&Name>) -> Result<ExprTree> {
        let mut ctx = ExprContext::new(self.index, self.namespace);
        if let Some(source) = anchor {
            ctx = ctx.with_anchor("self", source.clone());
        }
        self.service.normalize(expr, &ctx).map_err(|e| {
            Error::new(ErrorKind::Expression {
                expression: expr.to_string(),
                message: e.to_string(),
                offset: e.offset(),
            })
        })
    }

    /// The single type of a single-column result.
    fn single_type(expr: &str, tree: &ExprTree) -> Result<Name> {
        let [column] = tree.columns.as_slice() else {
            return Err(Error::ambiguous_result(
                expr,
                format!("{} result columns", tree.columns.len()),
            ));
        };
        match column.types.as_slice() {
            [ty] => Ok(ty.clone()),
            types => Err(Error::ambiguous_result(
                expr,
                format!("{} candidate types", types.len()),
            )),
        }
    }

    /// Type-checks a computable declared on `source`.
    ///
    /// Link-sourced computables must infer an atom.
    ///
    /// # Errors
    ///
    /// `AmbiguousResult` unless there is exactly one column of one type,
    /// `NonScalarComputable` for a non-atomic link computable, and
    /// `Expression` for service failures.
    pub fn computable(&self, name: &Name, source: &Name, expr: &str) -> Result<ResolvedComputable> {
        let tree = self.normalize(expr, Some(source))?;
        let target = Self::single_type(expr, &tree)?;
        let is_atom = self.index.is_atom(&target);
        let link_sourced = self.index.get_kind(source, PrototypeKind::Link).is_some();
        if link_sourced && !is_atom {
            return Err(Error::new(ErrorKind::NonScalarComputable {
                name: name.to_string(),
                target: target.to_string(),
            }));
        }
        let is_local = tree.references.as_slice() == std::slice::from_ref(source);
        trace!(computable = %name, target = %target, is_local, "resolved computable");
        Ok(ResolvedComputable {
            text: tree.text,
            target,
            is_atom,
            is_local,
        })
    }

    /// Type-checks a default query for `pointer`.
    ///
    /// # Errors
    ///
    /// `AmbiguousResult` unless there is exactly one column,
    /// `DefaultTypeMismatch` if a candidate type is not `target` or a
    /// subtype, and `IncompatibleDefaultMapping` for object defaults on a
    /// pointer whose mapping is not `1*` or `**`.
    pub fn default_query(
        &self,
        pointer: &Name,
        target: &Name,
        mapping: LinkMapping,
        expr: &str,
    ) -> Result<String> {
        let tree = self.normalize(expr, None)?;
        let [column] = tree.columns.as_slice() else {
            return Err(Error::ambiguous_result(
                expr,
                format!("{} result columns", tree.columns.len()),
            ));
        };
        let mismatch = column
            .types
            .iter()
            .find(|ty| !self.index.is_subclass(ty, target));
        if column.types.is_empty() || mismatch.is_some() {
            return Err(Error::new(ErrorKind::DefaultTypeMismatch {
                pointer: pointer.to_string(),
                expected: target.to_string(),
                actual: mismatch.map_or_else(|| "nothing".to_string(), ToString::to_string),
            }));
        }
        if !self.index.is_atom(target)
            && !matches!(mapping, LinkMapping::OneToMany | LinkMapping::ManyToMany)
        {
            return Err(Error::new(ErrorKind::IncompatibleDefaultMapping {
                pointer: pointer.to_string(),
                mapping: mapping.to_string(),
            }));
        }
        trace!(pointer = %pointer, "resolved default query");
        Ok(tree.text)
    }

    /// Type-checks an index expression on `source`.
    ///
    /// # Errors
    ///
    /// `NonAtomicIndex` if atomic indexes are required and a column may
    /// yield a non-atom, and `Expression` for service failures.
    pub fn index(&self, source: &Name, expr: &str) -> Result<String> {
        let tree = self.normalize(expr, Some(source))?;
        if self.require_atomic_indexes {
            let offending = tree
                .columns
                .iter()
                .flat_map(|c| c.types.iter())
                .find(|ty| !self.index.is_atom(ty));
            if let Some(ty) = offending {
                return Err(Error::new(ErrorKind::NonAtomicIndex {
                    expression: expr.to_string(),
                    actual: ty.to_string(),
                }));
            }
        }
        trace!(source = %source, "resolved index");
        Ok(tree.text)
    }
}

// =============================================================================
// Tests
// =============================================================================
