//! Module wiring for document tools.

use crate::create::CreateDocument;
use crate::store::{DocumentStore, InMemoryDocumentStore};
use loopstack_core::module::{CoreModule, Module, Registry};
use loopstack_core::Result;
use std::fmt;
use std::sync::Arc;

/// Installs the `createDocument` tool.
///
/// Document type descriptors stay with the modules that own them; this
/// module contributes only the storage tool and the store behind it.
pub struct DocumentsModule {
    store: Arc<dyn DocumentStore>,
}

impl DocumentsModule {
    /// Create the module backed by the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

impl Default for DocumentsModule {
    /// Module backed by a fresh [`InMemoryDocumentStore`].
    fn default() -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()))
    }
}

impl fmt::Debug for DocumentsModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentsModule").finish_non_exhaustive()
    }
}

impl Module for DocumentsModule {
    fn name(&self) -> &str {
        "documents"
    }

    fn imports(&self) -> Vec<Box<dyn Module>> {
        vec![Box::new(CoreModule)]
    }

    fn register(&self, registry: &mut Registry) -> Result<()> {
        registry.register_tool(Arc::new(CreateDocument::new(Arc::clone(&self.store))));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create::CREATE_DOCUMENT;
    use loopstack_core::tool::ToolContext;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn installs_the_create_tool() {
        let mut registry = Registry::new();
        registry.install(&DocumentsModule::default()).unwrap();

        assert!(registry.is_installed("core"));
        assert!(registry.is_installed("documents"));
        assert!(registry.tools().has_tool(CREATE_DOCUMENT));
    }

    #[tokio::test]
    async fn registered_tool_writes_into_the_caller_store() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let module = DocumentsModule::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

        let mut registry = Registry::new();
        registry.install(&module).unwrap();

        let tool = registry.tools().get(CREATE_DOCUMENT).unwrap();
        tool.execute(
            json!({ "update": { "content": "shared" } }),
            &ToolContext::new(Uuid::new_v4(), "test"),
        )
        .await
        .unwrap();

        assert_eq!(store.len(), 1);
    }
}
