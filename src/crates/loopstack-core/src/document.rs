//! Document shape descriptors
//!
//! A [`DocumentDescriptor`] names a document shape a workflow can bind to a
//! transition. Descriptors carry metadata only; persistence is provided by a
//! document store module that registers a tool consuming the binding.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named document shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    /// Binding name workflows use to reference this document shape
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// JSON Schema for document content, when the shape publishes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_schema: Option<Value>,
}

impl DocumentDescriptor {
    /// Create a descriptor with the given binding name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            content_schema: None,
        }
    }

    /// Set the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the content schema
    pub fn with_content_schema(mut self, schema: Value) -> Self {
        self.content_schema = Some(schema);
        self
    }
}

/// Registry of document shapes available to workflows
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    documents: HashMap<String, DocumentDescriptor>,
}

impl DocumentRegistry {
    /// Create a new empty document registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its binding name
    pub fn register(&mut self, descriptor: DocumentDescriptor) {
        self.documents.insert(descriptor.name.clone(), descriptor);
    }

    /// Get a descriptor by binding name
    pub fn get(&self, name: &str) -> Option<&DocumentDescriptor> {
        self.documents.get(name)
    }

    /// Check if a descriptor is registered
    pub fn has_document(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    /// All registered binding names, sorted
    pub fn document_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.documents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when no descriptors are registered
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registers_and_resolves_descriptors() {
        let mut registry = DocumentRegistry::new();
        registry.register(
            DocumentDescriptor::new("aiMessageDocument")
                .with_title("AI Message")
                .with_content_schema(json!({"type": "object"})),
        );

        assert!(registry.has_document("aiMessageDocument"));
        let descriptor = registry.get("aiMessageDocument").unwrap();
        assert_eq!(descriptor.title.as_deref(), Some("AI Message"));
        assert_eq!(registry.document_names(), vec!["aiMessageDocument"]);
    }

    #[test]
    fn missing_descriptor_resolves_to_none() {
        let registry = DocumentRegistry::new();
        assert!(registry.get("unknown").is_none());
        assert!(registry.is_empty());
    }
}
