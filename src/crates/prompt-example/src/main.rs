//! Runs the prompt workflow against a real LLM provider.
//!
//! Requires `OPENAI_API_KEY`. Pass a subject as the first argument:
//!
//! ```text
//! OPENAI_API_KEY=... cargo run -p prompt-example -- "autumn rain"
//! ```

use loopstack_ai::HttpLlmClient;
use loopstack_core::{ExecutionContext, Registry, WorkflowProcessor};
use loopstack_documents::{DocumentStore, InMemoryDocumentStore};
use prompt_example::{PromptExampleModule, PromptWorkflow};
use serde_json::json;
use std::sync::Arc;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = match std::env::var("RUST_LOG").as_deref() {
        Ok("trace") => Level::TRACE,
        Ok("debug") => Level::DEBUG,
        Ok("warn") => Level::WARN,
        Ok("error") => Level::ERROR,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let store = Arc::new(InMemoryDocumentStore::new());
    let mut registry = Registry::new();
    registry.install(&PromptExampleModule::new(
        Arc::new(HttpLlmClient::new()),
        Arc::clone(&store) as Arc<dyn DocumentStore>,
    ))?;

    let workflow = PromptWorkflow::new(&registry)?;

    let arguments = match std::env::args().nth(1) {
        Some(subject) => json!({ "subject": subject }),
        None => json!({}),
    };

    let processor = WorkflowProcessor::new();
    let result = processor
        .process(&workflow, arguments, ExecutionContext::new())
        .await?;

    if !result.succeeded() {
        let reason = result
            .runtime
            .error_message
            .as_deref()
            .unwrap_or("unknown error");
        return Err(format!("workflow halted at '{}': {}", result.place, reason).into());
    }

    for document in store.list().await? {
        tracing::info!(id = %document.id, doc_type = %document.doc_type, "stored document");
        if let Some(text) = document.content["parts"][0]["text"].as_str() {
            println!("{}", text);
        }
    }

    Ok(())
}
