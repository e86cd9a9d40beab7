//! Application module wiring.

use loopstack_ai::{AiModule, LlmClient};
use loopstack_core::module::{CoreModule, Module, Registry};
use loopstack_core::Result;
use loopstack_documents::{DocumentsModule, DocumentStore};
use std::fmt;
use std::sync::Arc;

/// Wires the prompt example: core runtime, document storage, and AI.
///
/// The module itself registers nothing; it exists to pull in its imports
/// with the application's client and store.
pub struct PromptExampleModule {
    llm_client: Arc<dyn LlmClient>,
    document_store: Arc<dyn DocumentStore>,
}

impl PromptExampleModule {
    /// Create the module with the application's LLM client and document store.
    pub fn new(llm_client: Arc<dyn LlmClient>, document_store: Arc<dyn DocumentStore>) -> Self {
        Self {
            llm_client,
            document_store,
        }
    }
}

impl fmt::Debug for PromptExampleModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptExampleModule").finish_non_exhaustive()
    }
}

impl Module for PromptExampleModule {
    fn name(&self) -> &str {
        "prompt-example"
    }

    fn imports(&self) -> Vec<Box<dyn Module>> {
        vec![
            Box::new(CoreModule),
            Box::new(DocumentsModule::new(Arc::clone(&self.document_store))),
            Box::new(AiModule::new(Arc::clone(&self.llm_client))),
        ]
    }

    fn register(&self, _registry: &mut Registry) -> Result<()> {
        Ok(())
    }
}
