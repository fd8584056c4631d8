//! The schema loader: drives intake, linking and materialization.
//!
//! A loader owns the global index. Each [`SchemaLoader::load_module`] call
//! reads one module into it; a top-level load then orders every module read
//! since the last materialization and produces a [`Schema`].
//!
//! A failed load leaves the loader exactly as it was before the call.

use indexmap::IndexMap;
use schemalink_foundation::{Error, RawValue, Result};
use schemalink_schema::{BUILTIN_MODULE, Namespace, Schema, SchemaIndex};
use tracing::{debug, info};

use crate::builtins;
use crate::config::LoaderConfig;
use crate::context::ImportContext;
use crate::expr::{ExpressionService, PathExpressionService};
use crate::intake::read_module;
use crate::linearize::linearize;
use crate::linker::Linker;
use crate::materialize::materialize;
use crate::order::order;

/// Loads modules into a global index and materializes schemas from it.
#[derive(Clone, Debug)]
pub struct SchemaLoader<S = PathExpressionService> {
    config: LoaderConfig,
    service: S,
    global: SchemaIndex,
    /// Namespaces of loaded modules, in load order.
    namespaces: IndexMap<String, Namespace>,
    /// Modules read but not yet ordered.
    pending: Vec<String>,
}

impl SchemaLoader<PathExpressionService> {
    /// Creates a loader with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the builtin module fails to load.
    pub fn new() -> Result<Self> {
        Self::with_config(LoaderConfig::default())
    }

    /// Creates a loader with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the builtin module fails to load.
    pub fn with_config(config: LoaderConfig) -> Result<Self> {
        Self::with_service(config, PathExpressionService::new())
    }
}

impl<S: ExpressionService> SchemaLoader<S> {
    /// Creates a loader that type-checks expressions with `service`.
    ///
    /// # Errors
    ///
    /// Returns an error if the builtin module fails to load.
    pub fn with_service(config: LoaderConfig, service: S) -> Result<Self> {
        let mut loader = Self {
            config,
            service,
            global: SchemaIndex::new(),
            namespaces: IndexMap::new(),
            pending: Vec::new(),
        };
        if loader.config.load_builtins {
            let ctx = ImportContext::new(BUILTIN_MODULE).with_document("<builtins>");
            loader.load_module(&ctx, &builtins::module())?;
        }
        Ok(loader)
    }

    /// The loader configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The global index: every declaration of every loaded module.
    #[must_use]
    pub fn global(&self) -> &SchemaIndex {
        &self.global
    }

    /// Returns true if `module` has been loaded.
    #[must_use]
    pub fn is_loaded(&self, module: &str) -> bool {
        self.namespaces.contains_key(module)
    }

    /// Loaded modules, in load order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Loads one module.
    ///
    /// Returns the materialized schema if `ctx` is top-level, else `None`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage. The loader is rolled
    /// back to its state before the call.
    pub fn load_module(&mut self, ctx: &ImportContext, tree: &RawValue) -> Result<Option<Schema>> {
        let global = self.global.clone();
        let namespaces = self.namespaces.clone();
        let pending = self.pending.clone();

        self.try_load(ctx, tree).inspect_err(|e| {
            debug!(module = %ctx.module, error = %e, "load failed, rolling back");
            self.global = global;
            self.namespaces = namespaces;
            self.pending = pending;
        })
    }

    /// Orders every pending module and materializes a schema for
    /// `main_module`.
    ///
    /// # Errors
    ///
    /// Returns the first ordering or validation error. The loader is rolled
    /// back to its state before the call.
    pub fn materialize(&mut self, main_module: Option<&str>) -> Result<Schema> {
        let global = self.global.clone();
        let namespaces = self.namespaces.clone();
        let pending = self.pending.clone();
        let include_builtin = self.config.include_builtin;

        self.finish(main_module.map(str::to_string), include_builtin)
            .inspect_err(|_| {
                self.global = global;
                self.namespaces = namespaces;
                self.pending = pending;
            })
    }

    fn try_load(&mut self, ctx: &ImportContext, tree: &RawValue) -> Result<Option<Schema>> {
        if self.is_loaded(&ctx.module) {
            return Err(Error::duplicate_name(format!("module {}", ctx.module)));
        }
        for (alias, module) in &ctx.imports {
            if !self.is_loaded(module) {
                return Err(Error::unresolved_name(format!(
                    "module {module} (imported as {alias})"
                )));
            }
        }

        let raw = read_module(tree, ctx, &self.config)?;
        let mut ns = ctx.namespace();
        Linker::new(&mut self.global, &mut ns).read(raw)?;
        linearize(&mut self.global)?;

        self.namespaces.insert(ctx.module.clone(), ns);
        self.pending.push(ctx.module.clone());
        info!(module = %ctx.module, toplevel = ctx.toplevel, "loaded module");

        if !ctx.toplevel {
            return Ok(None);
        }
        let include_builtin = ctx.include_builtin || self.config.include_builtin;
        self.finish(Some(ctx.module.clone()), include_builtin).map(Some)
    }

    fn finish(&mut self, main_module: Option<String>, include_builtin: bool) -> Result<Schema> {
        for module in std::mem::take(&mut self.pending) {
            if let Some(ns) = self.namespaces.get_mut(&module) {
                order(&mut self.global, ns, &self.service, &self.config)?;
            }
        }
        materialize(&mut self.global, main_module, include_builtin)
    }
}

// =============================================================================
// Tests
// =============================================================================
