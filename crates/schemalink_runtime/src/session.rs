//! Module sessions.
//!
//! A [`SchemaSession`] owns a [`SchemaLoader`] and a [`ModuleRegistry`] of
//! module sources. Loading a module loads its imports first, depth first,
//! and detects import cycles with a loading stack.

use indexmap::IndexMap;
use schemalink_foundation::{Error, ErrorKind, RawValue, Result, SourceMap};
use schemalink_resolver::{
    ExpressionService, ImportContext, LoaderConfig, PathExpressionService, SchemaLoader,
};
use schemalink_schema::Schema;
use tracing::debug;

// =============================================================================
// ModuleSource
// =============================================================================

/// A module document, parsed, with its import aliases.
#[derive(Clone, Debug)]
pub struct ModuleSource {
    /// Module name.
    pub module: String,
    /// Import aliases: `alias` → module.
    pub imports: IndexMap<String, String>,
    /// The parsed module tree.
    pub tree: RawValue,
    /// Document name used in diagnostics.
    pub document: Option<String>,
    /// Positions of declarations in the document.
    pub source_map: SourceMap,
}

impl ModuleSource {
    /// Creates a source for `module` with no imports.
    #[must_use]
    pub fn new(module: impl Into<String>, tree: RawValue) -> Self {
        Self {
            module: module.into(),
            imports: IndexMap::new(),
            tree,
            document: None,
            source_map: SourceMap::new(),
        }
    }

    /// Adds an import alias.
    #[must_use]
    pub fn with_import(mut self, alias: impl Into<String>, module: impl Into<String>) -> Self {
        self.imports.insert(alias.into(), module.into());
        self
    }

    /// Sets the document name.
    #[must_use]
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Sets the source map.
    #[must_use]
    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = source_map;
        self
    }

    fn context(&self, toplevel: bool) -> ImportContext {
        let mut ctx = ImportContext::new(self.module.clone())
            .with_toplevel(toplevel)
            .with_source_map(self.source_map.clone());
        ctx.imports.clone_from(&self.imports);
        if let Some(document) = &self.document {
            ctx = ctx.with_document(document.clone());
        }
        ctx
    }
}

// =============================================================================
// ModuleRegistry
// =============================================================================

/// Registered module sources and the modules currently being loaded.
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    sources: IndexMap<String, ModuleSource>,
    loading_stack: Vec<String>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module source.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if a source with the same module name is
    /// already registered.
    pub fn register(&mut self, source: ModuleSource) -> Result<()> {
        if self.sources.contains_key(&source.module) {
            return Err(Error::duplicate_name(format!("module {}", source.module)));
        }
        self.sources.insert(source.module.clone(), source);
        Ok(())
    }

    /// Looks up a registered source.
    #[must_use]
    pub fn get(&self, module: &str) -> Option<&ModuleSource> {
        self.sources.get(module)
    }

    /// Registered module names, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns true if `module` is currently being loaded.
    #[must_use]
    pub fn is_loading(&self, module: &str) -> bool {
        self.loading_stack.iter().any(|m| m == module)
    }

    /// Pushes a module onto the loading stack.
    ///
    /// # Errors
    ///
    /// Returns `CyclicImport` if the module is already being loaded.
    pub fn begin_loading(&mut self, module: &str) -> Result<()> {
        if self.is_loading(module) {
            let mut cycle: Vec<String> = self
                .loading_stack
                .iter()
                .skip_while(|m| *m != module)
                .cloned()
                .collect();
            cycle.push(module.to_string());
            return Err(Error::new(ErrorKind::CyclicImport { cycle }));
        }
        self.loading_stack.push(module.to_string());
        Ok(())
    }

    /// Pops a module from the loading stack.
    pub fn finish_loading(&mut self, module: &str) {
        if let Some(pos) = self.loading_stack.iter().position(|m| m == module) {
            self.loading_stack.remove(pos);
        }
    }

    /// The current loading stack, outermost first.
    #[must_use]
    pub fn loading_stack(&self) -> &[String] {
        &self.loading_stack
    }
}

// =============================================================================
// SchemaSession
// =============================================================================

/// A loader plus the module sources it loads from.
pub struct SchemaSession<S = PathExpressionService> {
    loader: SchemaLoader<S>,
    registry: ModuleRegistry,
}

impl SchemaSession<PathExpressionService> {
    /// Creates a session with the default loader configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the builtin module fails to load.
    pub fn new() -> Result<Self> {
        Self::with_config(LoaderConfig::default())
    }

    /// Creates a session with the given loader configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the builtin module fails to load.
    pub fn with_config(config: LoaderConfig) -> Result<Self> {
        Ok(Self::with_loader(SchemaLoader::with_config(config)?))
    }
}

impl<S: ExpressionService> SchemaSession<S> {
    /// Wraps an existing loader.
    #[must_use]
    pub fn with_loader(loader: SchemaLoader<S>) -> Self {
        Self {
            loader,
            registry: ModuleRegistry::new(),
        }
    }

    /// The loader.
    #[must_use]
    pub fn loader(&self) -> &SchemaLoader<S> {
        &self.loader
    }

    /// The module registry.
    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Registers a module source.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the module is already registered.
    pub fn register(&mut self, source: ModuleSource) -> Result<()> {
        self.registry.register(source)
    }

    /// Loads `module` as the top-level module, loading its imports first.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedName` for an unregistered module, `CyclicImport`
    /// for an import cycle, or any loader error.
    pub fn load(&mut self, module: &str) -> Result<Schema> {
        self.ensure_loaded(module, true)?
            .ok_or_else(|| Error::internal(format!("top-level load of {module} produced no schema")))
    }

    fn ensure_loaded(&mut self, module: &str, toplevel: bool) -> Result<Option<Schema>> {
        if !toplevel && self.loader.is_loaded(module) {
            return Ok(None);
        }
        self.registry.begin_loading(module)?;
        let result = self.load_source(module, toplevel);
        self.registry.finish_loading(module);
        result
    }

    fn load_source(&mut self, module: &str, toplevel: bool) -> Result<Option<Schema>> {
        let source = self
            .registry
            .get(module)
            .cloned()
            .ok_or_else(|| Error::unresolved_name(format!("module {module}")))?;
        for import in source.imports.values() {
            self.ensure_loaded(import, false)?;
        }
        debug!(module, toplevel, imports = source.imports.len(), "loading module source");
        self.loader
            .load_module(&source.context(toplevel), &source.tree)
    }
}
