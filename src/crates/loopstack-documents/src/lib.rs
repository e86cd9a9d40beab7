//! Documents module for loopstack-rs.
//!
//! This crate provides the `createDocument` tool and the [`DocumentStore`]
//! persistence seam behind it.
//!
//! Transitions that call `createDocument` pass the content under
//! `update.content` and name the document type via their `document:` binding:
//!
//! ```yaml
//! - name: store_document
//!   from: prompt_executed
//!   to: end
//!   call: createDocument
//!   with:
//!     update:
//!       content: "{state.llmResponse}"
//!   document: aiMessageDocument
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use loopstack_documents::{DocumentsModule, InMemoryDocumentStore};
//! use loopstack_core::Registry;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let mut registry = Registry::new();
//! registry.install(&DocumentsModule::new(store.clone()))?;
//!
//! // After a run, inspect what workflows stored:
//! for document in store.list().await? {
//!     println!("{}: {}", document.doc_type, document.content);
//! }
//! ```

pub mod create;
pub mod module;
pub mod store;

// Re-export commonly used types
pub use create::{CreateDocument, CreateDocumentInput, DocumentUpdate, CREATE_DOCUMENT};
pub use module::DocumentsModule;
pub use store::{Document, DocumentError, DocumentStore, InMemoryDocumentStore, Result};
