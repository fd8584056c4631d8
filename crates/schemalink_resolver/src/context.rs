//! Per-load import context.

use indexmap::IndexMap;
use schemalink_foundation::SourceMap;
use schemalink_schema::Namespace;

/// Describes the module being loaded and how it sees other modules.
#[derive(Clone, Debug)]
pub struct ImportContext {
    /// Module name the declarations are registered under.
    pub module: String,
    /// Import aliases: `alias` → module. Imported modules must already be
    /// loaded.
    pub imports: IndexMap<String, String>,
    /// Expose builtin declarations from the resulting schema.
    pub include_builtin: bool,
    /// Run ordering and materialization after intake.
    pub toplevel: bool,
    /// Document name used in diagnostics.
    pub document: Option<String>,
    /// Positions of declarations in the document.
    pub source_map: SourceMap,
}

impl ImportContext {
    /// Creates a top-level context for `module` with no imports.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            imports: IndexMap::new(),
            include_builtin: false,
            toplevel: true,
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

    /// Sets whether ordering and materialization run after intake.
    #[must_use]
    pub fn with_toplevel(mut self, toplevel: bool) -> Self {
        self.toplevel = toplevel;
        self
    }

    /// Sets whether builtins are exposed.
    #[must_use]
    pub fn with_include_builtin(mut self, include: bool) -> Self {
        self.include_builtin = include;
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

    /// The namespace this module resolves names in.
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        let mut ns = Namespace::new(self.module.clone());
        for (alias, module) in &self.imports {
            ns.add_alias(alias, module);
        }
        ns
    }
}
