//! Error types and error handling for workflow operations
//!
//! This module defines all error types that can occur during workflow
//! construction, validation, and execution. All errors implement
//! `std::error::Error` via the `thiserror` crate.
//!
//! # Error Hierarchy
//!
//! ```text
//! FlowError
//! ├── Validation         - Argument/state schema violations
//! ├── Template           - Placeholder resolution failures
//! ├── UnknownTool        - Tool binding not registered
//! ├── UnknownDocument    - Document binding not registered
//! ├── Tool               - Tool invocation errors
//! ├── Configuration      - Workflow/module configuration errors
//! ├── Execution          - General execution errors
//! ├── Yaml               - Workflow config parsing errors
//! ├── Serialization      - JSON errors
//! └── Io                 - File system errors
//! ```
//!
//! # Failure Surfaces
//!
//! Errors split into two surfaces. Anything wrong **before** a run starts
//! (invalid arguments, missing bindings, malformed configuration) is returned
//! as `Err(FlowError)` from [`WorkflowProcessor::process`]. A tool failing
//! **during** a run is not an `Err`: it is reported on the run result's
//! runtime flags, because the run itself completed with a recorded outcome.
//!
//! ```rust
//! use loopstack_core::error::{FlowError, Result};
//!
//! fn ensure_place(places: &[String], place: &str) -> Result<()> {
//!     if !places.iter().any(|p| p == place) {
//!         return Err(FlowError::Configuration(format!(
//!             "place '{}' is not declared",
//!             place
//!         )));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`WorkflowProcessor::process`]: crate::processor::WorkflowProcessor::process

use thiserror::Error;

use crate::schema::SchemaError;
use crate::tool::ToolError;

/// Convenience result type using [`FlowError`]
///
/// # Examples
///
/// ```rust
/// use loopstack_core::error::{FlowError, Result};
///
/// fn parse_state_path(path: &str) -> Result<&str> {
///     path.strip_prefix("state.")
///         .ok_or_else(|| FlowError::Template(format!("'{}' is not a state path", path)))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FlowError>;

/// Comprehensive error type for all workflow operations
///
/// `FlowError` represents all errors that can occur while building workflow
/// definitions, installing modules, and executing runs. It uses `thiserror`
/// for automatic `Error` trait implementation and includes context where
/// helpful.
///
/// # Examples
///
/// ```rust
/// use loopstack_core::error::FlowError;
///
/// let err = FlowError::UnknownTool("aiGenerateText".to_string());
/// assert_eq!(
///     format!("{}", err),
///     "Tool 'aiGenerateText' is not registered"
/// );
/// ```
#[derive(Error, Debug)]
pub enum FlowError {
    /// Arguments or state rejected by a schema
    ///
    /// Occurs when raw workflow arguments fail [`Schema::apply`], before any
    /// transition fires. No history exists when this is returned.
    ///
    /// [`Schema::apply`]: crate::schema::Schema::apply
    #[error("Validation failed: {0}")]
    Validation(#[from] SchemaError),

    /// Template placeholder could not be resolved
    ///
    /// **Common causes**:
    /// - Placeholder path not present in arguments or state
    /// - Embedding a non-scalar value inside a larger string
    #[error("Template error: {0}")]
    Template(String),

    /// A workflow referenced a tool binding that is not registered
    #[error("Tool '{0}' is not registered")]
    UnknownTool(String),

    /// A workflow referenced a document binding that is not registered
    #[error("Document '{0}' is not registered")]
    UnknownDocument(String),

    /// Tool invocation error
    ///
    /// Wraps [`ToolError`] for invocation failures that surface outside a
    /// run, such as input-schema violations detected by the registry.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Workflow or module configuration error
    ///
    /// **Common causes**:
    /// - Transition endpoints referencing undeclared places
    /// - Duplicate transition names
    /// - A `call:` naming a tool the definition never bound
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic execution error
    ///
    /// Used for runtime failures that are not tool failures, such as the
    /// step guard tripping on a cyclic configuration.
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Workflow configuration parsing error
    ///
    /// Wraps errors from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    ///
    /// Wraps errors from `serde_json::Error`.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O operation failed
    ///
    /// Wraps errors from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowError {
    /// Create a configuration error
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loopstack_core::error::FlowError;
    ///
    /// let err = FlowError::configuration("start place 'begin' is not declared");
    /// assert_eq!(
    ///     format!("{}", err),
    ///     "Configuration error: start place 'begin' is not declared"
    /// );
    /// ```
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a template error for an unresolvable placeholder path
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// True when the error originates from argument/state validation
    ///
    /// Callers use this to distinguish rejected input from runtime failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
