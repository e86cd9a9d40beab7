//! End-to-end tests for the prompt workflow, with tools mocked at the
//! registry seam.

use async_trait::async_trait;
use loopstack_ai::{AiMessage, LlmClient, LlmSettings, AI_GENERATE_TEXT};
use loopstack_core::testing::{MockTool, WorkflowTest};
use loopstack_core::{ToolHandler, Workflow};
use loopstack_documents::{DocumentStore, InMemoryDocumentStore, CREATE_DOCUMENT};
use prompt_example::{PromptExampleModule, PromptWorkflow};
use serde_json::{json, Value};
use std::sync::Arc;

/// Client stub behind the module; every test overrides the generation tool,
/// so this is never called.
struct NullClient;

#[async_trait]
impl LlmClient for NullClient {
    async fn generate(
        &self,
        _settings: &LlmSettings,
        _prompt: &str,
    ) -> loopstack_ai::Result<AiMessage> {
        Ok(AiMessage::assistant(""))
    }
}

fn mock_llm_response() -> Value {
    json!({
        "role": "assistant",
        "parts": [{
            "type": "text",
            "text": "Cherry blossoms fall\nPink petals dance in the wind\nSpring whispers goodbye",
        }],
    })
}

fn app_module() -> PromptExampleModule {
    PromptExampleModule::new(Arc::new(NullClient), Arc::new(InMemoryDocumentStore::new()))
}

fn harness(generate: Arc<MockTool>, create: Arc<MockTool>) -> WorkflowTest {
    WorkflowTest::builder()
        .with_module(app_module())
        .with_tool_override(generate)
        .with_tool_override(create)
        .build()
        .unwrap()
}

#[test]
fn workflow_binds_the_expected_tools() {
    let generate = Arc::new(MockTool::new(AI_GENERATE_TEXT));
    let create = Arc::new(MockTool::new(CREATE_DOCUMENT));
    let test = harness(generate, create);

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    assert_eq!(workflow.name(), "prompt");

    let tools = workflow.tools();
    assert!(tools.contains(&"aiGenerateText".to_string()));
    assert!(tools.contains(&"createDocument".to_string()));
    assert_eq!(workflow.documents(), vec!["aiMessageDocument".to_string()]);
}

#[test]
fn default_argument_value_is_applied() {
    let generate = Arc::new(MockTool::new(AI_GENERATE_TEXT));
    let create = Arc::new(MockTool::new(CREATE_DOCUMENT));
    let test = harness(generate, create);

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    let resolved = workflow.validate(&json!({})).unwrap();
    assert_eq!(resolved, json!({ "subject": "coffee" }));
}

#[tokio::test]
async fn generates_a_haiku_about_the_given_subject() {
    let generate = Arc::new(
        MockTool::new(AI_GENERATE_TEXT).with_response(json!({ "data": mock_llm_response() })),
    );
    let create = Arc::new(MockTool::new(CREATE_DOCUMENT).with_response(json!({})));
    let test = harness(Arc::clone(&generate), Arc::clone(&create));

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    let result = test
        .run(&workflow, json!({ "subject": "spring" }))
        .await
        .unwrap();

    assert!(!result.runtime.error);

    // The generation step sees rendered arguments.
    assert_eq!(generate.call_count(), 1);
    assert_eq!(
        generate.last_call().unwrap(),
        json!({
            "llm": { "provider": "openai", "model": "gpt-4o" },
            "prompt": "Write a haiku about spring",
        })
    );

    // The storage step receives the whole message, not its rendering.
    assert_eq!(create.call_count(), 1);
    assert_eq!(
        create.last_call().unwrap(),
        json!({ "update": { "content": mock_llm_response() } })
    );

    // The assigned state survives into the result.
    let expected = mock_llm_response();
    assert_eq!(result.state.get("llmResponse"), Some(&expected));

    // History records each entered place in order.
    let places = result.state.caretaker.places();
    assert_eq!(places, vec!["prompt_executed", "end"]);
    assert_eq!(result.place, "end");
}

#[tokio::test]
async fn tool_contexts_carry_place_and_document_binding() {
    let generate = Arc::new(
        MockTool::new(AI_GENERATE_TEXT).with_response(json!({ "data": mock_llm_response() })),
    );
    let create = Arc::new(MockTool::new(CREATE_DOCUMENT).with_response(json!({})));
    let test = harness(Arc::clone(&generate), Arc::clone(&create));

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    test.run(&workflow, json!({})).await.unwrap();

    let generate_ctx = &generate.contexts()[0];
    assert_eq!(generate_ctx.workflow, "prompt");
    assert_eq!(generate_ctx.place, "prompt_executed");
    assert_eq!(generate_ctx.transition, "generate_haiku");
    assert_eq!(generate_ctx.document, None);

    let create_ctx = &create.contexts()[0];
    assert_eq!(create_ctx.place, "end");
    assert_eq!(create_ctx.transition, "store_document");
    assert_eq!(create_ctx.document.as_deref(), Some("aiMessageDocument"));

    // The storage step already sees the assigned response in its snapshot.
    assert_eq!(create_ctx.state["llmResponse"], mock_llm_response());
}

#[tokio::test]
async fn uses_the_default_subject_when_not_provided() {
    let generate = Arc::new(
        MockTool::new(AI_GENERATE_TEXT).with_response(json!({ "data": mock_llm_response() })),
    );
    let create = Arc::new(MockTool::new(CREATE_DOCUMENT).with_response(json!({})));
    let test = harness(Arc::clone(&generate), Arc::clone(&create));

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    let result = test.run(&workflow, json!({})).await.unwrap();

    assert!(!result.runtime.error);
    let call = generate.last_call().unwrap();
    assert_eq!(call["prompt"], "Write a haiku about coffee");
}

#[tokio::test]
async fn generation_failure_halts_the_run_before_storage() {
    let generate = Arc::new(MockTool::new(AI_GENERATE_TEXT).with_failure("rate limited"));
    let create = Arc::new(MockTool::new(CREATE_DOCUMENT));
    let test = harness(Arc::clone(&generate), Arc::clone(&create));

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    let result = test.run(&workflow, json!({})).await.unwrap();

    assert!(result.runtime.error);
    let message = result.runtime.error_message.as_deref().unwrap_or("");
    assert!(message.contains("rate limited"));

    // The run stops where it failed and never reaches the storage step.
    assert_eq!(result.place, "start");
    assert_eq!(create.call_count(), 0);
    assert!(!result.state.caretaker.places().contains(&"prompt_executed"));
}

#[tokio::test]
async fn stores_the_llm_response_as_a_document() {
    let store = Arc::new(InMemoryDocumentStore::new());
    // Only the LLM call is mocked; the real createDocument writes the store.
    let generate = Arc::new(
        MockTool::new(AI_GENERATE_TEXT).with_response(json!({ "data": mock_llm_response() })),
    );

    let test = WorkflowTest::builder()
        .with_module(PromptExampleModule::new(
            Arc::new(NullClient),
            Arc::clone(&store) as Arc<dyn DocumentStore>,
        ))
        .with_tool_override(Arc::clone(&generate) as Arc<dyn ToolHandler>)
        .build()
        .unwrap();

    let workflow = PromptWorkflow::new(test.registry()).unwrap();
    let result = test
        .run(&workflow, json!({ "subject": "spring" }))
        .await
        .unwrap();
    assert!(result.succeeded());

    let documents = store.list().await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].doc_type, "aiMessageDocument");
    assert_eq!(documents[0].content, mock_llm_response());
}
