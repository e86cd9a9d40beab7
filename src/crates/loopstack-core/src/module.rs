//! Module composition
//!
//! A [`Module`] is a unit of wiring: it registers tools and document shapes
//! into a shared [`Registry`] and declares the modules it depends on.
//! Installing a module installs its imports first, each module at most once
//! regardless of how many import paths reach it.
//!
//! Applications compose a registry once at startup, construct their workflow
//! definitions against it, and hand both to the processor.

use std::collections::HashSet;
use std::sync::Arc;

use crate::document::{DocumentDescriptor, DocumentRegistry};
use crate::error::Result;
use crate::tool::{ToolHandler, ToolRegistry};

/// Composition unit registering tools and document shapes
pub trait Module: Send + Sync {
    /// Module name, used to install each module at most once
    fn name(&self) -> &str;

    /// Modules this module depends on, installed before it
    fn imports(&self) -> Vec<Box<dyn Module>> {
        Vec::new()
    }

    /// Register this module's tools and document shapes
    fn register(&self, registry: &mut Registry) -> Result<()>;
}

/// Shared tool and document registries produced by installing modules
#[derive(Debug, Default)]
pub struct Registry {
    tools: ToolRegistry,
    documents: DocumentRegistry,
    installed: HashSet<String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a module and its imports
    ///
    /// Imports are installed depth-first before the module itself. A module
    /// already installed under the same name is skipped, which also breaks
    /// import cycles.
    pub fn install(&mut self, module: &dyn Module) -> Result<()> {
        if !self.installed.insert(module.name().to_string()) {
            return Ok(());
        }
        for import in module.imports() {
            self.install(import.as_ref())?;
        }
        module.register(self)?;
        tracing::debug!(module = %module.name(), "module installed");
        Ok(())
    }

    /// True when a module with this name has been installed
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(name)
    }

    /// Register a tool under its binding name
    pub fn register_tool(&mut self, tool: Arc<dyn ToolHandler>) {
        self.tools.register(tool);
    }

    /// Replace an existing tool registration
    pub fn override_tool(&mut self, tool: Arc<dyn ToolHandler>) -> Result<()> {
        self.tools.override_tool(tool)?;
        Ok(())
    }

    /// Register a document shape
    pub fn register_document(&mut self, descriptor: DocumentDescriptor) {
        self.documents.register(descriptor);
    }

    /// The tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The document registry
    pub fn documents(&self) -> &DocumentRegistry {
        &self.documents
    }
}

/// The runtime's own composition anchor
///
/// Registers nothing. Application modules import it to declare their
/// dependency on the runtime, which keeps module graphs explicit about what
/// they are built on.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreModule;

impl Module for CoreModule {
    fn name(&self) -> &str {
        "core"
    }

    fn register(&self, _registry: &mut Registry) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{ToolContext, ToolResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct NamedTool(&'static str);

    #[async_trait]
    impl ToolHandler for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        async fn execute(&self, _input: Value, _ctx: &ToolContext) -> ToolResult {
            Ok(json!({}))
        }
    }

    struct RecordingModule {
        name: &'static str,
        imports: Vec<&'static str>,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Module for RecordingModule {
        fn name(&self) -> &str {
            self.name
        }

        fn imports(&self) -> Vec<Box<dyn Module>> {
            self.imports
                .iter()
                .copied()
                .map(|name| {
                    Box::new(RecordingModule {
                        name,
                        imports: Vec::new(),
                        log: Arc::clone(&self.log),
                    }) as Box<dyn Module>
                })
                .collect()
        }

        fn register(&self, registry: &mut Registry) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            registry.register_tool(Arc::new(NamedTool(self.name)));
            Ok(())
        }
    }

    #[test]
    fn imports_install_before_the_importer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let module = RecordingModule {
            name: "app",
            imports: vec!["documents", "ai"],
            log: Arc::clone(&log),
        };

        let mut registry = Registry::new();
        registry.install(&module).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["documents", "ai", "app"]);
        assert!(registry.is_installed("app"));
        assert!(registry.tools().has_tool("documents"));
    }

    #[test]
    fn repeated_installs_register_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let module = RecordingModule {
            name: "shared",
            imports: Vec::new(),
            log: Arc::clone(&log),
        };

        let mut registry = Registry::new();
        registry.install(&module).unwrap();
        registry.install(&module).unwrap();

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn core_module_registers_nothing() {
        let mut registry = Registry::new();
        registry.install(&CoreModule).unwrap();

        assert!(registry.is_installed("core"));
        assert!(registry.tools().is_empty());
        assert!(registry.documents().is_empty());
    }

    #[test]
    fn override_reaches_the_tool_registry() {
        let mut registry = Registry::new();
        registry.register_tool(Arc::new(NamedTool("target")));
        assert!(registry.override_tool(Arc::new(NamedTool("target"))).is_ok());
        assert!(registry.override_tool(Arc::new(NamedTool("absent"))).is_err());
    }
}
