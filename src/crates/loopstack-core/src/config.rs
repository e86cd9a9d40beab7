//! YAML-based workflow configurations

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlowError, Result};

/// Identifier of a place in a workflow's state machine
pub type PlaceId = String;

/// Top-level workflow configuration
///
/// Declares the places a run can occupy and the transitions between them.
/// Each transition names a tool to call; the run walks from `start` until it
/// reaches a place with no outgoing transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow name
    pub name: String,

    /// Workflow description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Place a run starts in
    pub start: PlaceId,

    /// All places a run can occupy
    pub places: Vec<PlaceId>,

    /// Transitions between places
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
}

/// One transition: a tool call that moves the run between places
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Transition name
    pub name: String,

    /// Place the transition leaves
    pub from: PlaceId,

    /// Place the transition enters
    pub to: PlaceId,

    /// Tool binding to invoke
    pub call: String,

    /// Templated tool input, rendered against arguments and state
    #[serde(default = "empty_object")]
    pub with: Value,

    /// State field that receives the tool result's data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign: Option<String>,

    /// Document binding forwarded to the tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl WorkflowConfig {
    /// Load a workflow configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a workflow configuration from a YAML string
    pub fn from_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate the configuration
    ///
    /// Checks that the start place and every transition endpoint is
    /// declared, that place and transition names are unique, and that no
    /// place has more than one outgoing transition. This runtime executes
    /// linear chains; a configuration that loops back on itself is rejected
    /// here rather than at run time.
    pub fn validate(&self) -> Result<()> {
        let mut place_names = HashSet::new();
        for place in &self.places {
            if !place_names.insert(place.as_str()) {
                return Err(FlowError::Configuration(format!(
                    "Duplicate place: {}",
                    place
                )));
            }
        }

        if !place_names.contains(self.start.as_str()) {
            return Err(FlowError::Configuration(format!(
                "Start place '{}' is not declared",
                self.start
            )));
        }

        let mut transition_names = HashSet::new();
        let mut outgoing = HashSet::new();
        for transition in &self.transitions {
            if !transition_names.insert(transition.name.as_str()) {
                return Err(FlowError::Configuration(format!(
                    "Duplicate transition name: {}",
                    transition.name
                )));
            }
            if !place_names.contains(transition.from.as_str()) {
                return Err(FlowError::Configuration(format!(
                    "Transition '{}' leaves undeclared place '{}'",
                    transition.name, transition.from
                )));
            }
            if !place_names.contains(transition.to.as_str()) {
                return Err(FlowError::Configuration(format!(
                    "Transition '{}' enters undeclared place '{}'",
                    transition.name, transition.to
                )));
            }
            if !outgoing.insert(transition.from.as_str()) {
                return Err(FlowError::Configuration(format!(
                    "Place '{}' has more than one outgoing transition",
                    transition.from
                )));
            }
        }

        // Follow the chain from start; with one outgoing transition per
        // place, revisiting a place means the chain never terminates.
        let mut visited = HashSet::new();
        let mut current = self.start.as_str();
        visited.insert(current);
        while let Some(transition) = self.transition_from(current) {
            current = transition.to.as_str();
            if !visited.insert(current) {
                return Err(FlowError::Configuration(format!(
                    "Transitions loop back to place '{}'",
                    current
                )));
            }
        }

        Ok(())
    }

    /// The transition leaving a place, if any
    pub fn transition_from(&self, place: &str) -> Option<&TransitionConfig> {
        self.transitions.iter().find(|t| t.from == place)
    }

    /// Look up a transition by name
    pub fn transition_named(&self, name: &str) -> Option<&TransitionConfig> {
        self.transitions.iter().find(|t| t.name == name)
    }

    /// True when the place has no outgoing transition
    pub fn is_terminal(&self, place: &str) -> bool {
        self.transition_from(place).is_none()
    }

    /// True when the place is declared
    pub fn has_place(&self, place: &str) -> bool {
        self.places.iter().any(|p| p == place)
    }

    /// Convert to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LINEAR_CONFIG: &str = r#"
name: generate
start: start
places:
  - start
  - generated
  - end

transitions:
  - name: generate_text
    from: start
    to: generated
    call: aiGenerateText
    with:
      prompt: "Write a haiku about {subject}"
    assign: llmResponse
  - name: store
    from: generated
    to: end
    call: createDocument
    with:
      update:
        content: "{state.llmResponse}"
    document: aiMessageDocument
"#;

    #[test]
    fn parses_linear_configuration() {
        let config = WorkflowConfig::from_str(LINEAR_CONFIG).unwrap();
        assert_eq!(config.name, "generate");
        assert_eq!(config.start, "start");
        assert_eq!(config.places.len(), 3);
        assert_eq!(config.transitions.len(), 2);
        assert!(config.validate().is_ok());

        let generate = config.transition_named("generate_text").unwrap();
        assert_eq!(generate.call, "aiGenerateText");
        assert_eq!(generate.assign.as_deref(), Some("llmResponse"));
        assert_eq!(
            generate.with,
            json!({"prompt": "Write a haiku about {subject}"})
        );

        let store = config.transition_named("store").unwrap();
        assert_eq!(store.document.as_deref(), Some("aiMessageDocument"));
        assert!(store.assign.is_none());
    }

    #[test]
    fn transition_lookup_follows_the_chain() {
        let config = WorkflowConfig::from_str(LINEAR_CONFIG).unwrap();
        assert_eq!(config.transition_from("start").unwrap().to, "generated");
        assert_eq!(config.transition_from("generated").unwrap().to, "end");
        assert!(config.is_terminal("end"));
        assert!(!config.is_terminal("start"));
    }

    #[test]
    fn missing_with_defaults_to_empty_object() {
        let yaml = r#"
name: minimal
start: a
places: [a, b]
transitions:
  - name: step
    from: a
    to: b
    call: noop
"#;
        let config = WorkflowConfig::from_str(yaml).unwrap();
        assert_eq!(config.transitions[0].with, json!({}));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn undeclared_start_place_fails_validation() {
        let yaml = r#"
name: broken
start: missing
places: [a]
transitions: []
"#;
        let config = WorkflowConfig::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn undeclared_transition_target_fails_validation() {
        let yaml = r#"
name: broken
start: a
places: [a]
transitions:
  - name: step
    from: a
    to: nowhere
    call: noop
"#;
        let config = WorkflowConfig::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn branching_is_rejected() {
        let yaml = r#"
name: branching
start: a
places: [a, b, c]
transitions:
  - name: left
    from: a
    to: b
    call: noop
  - name: right
    from: a
    to: c
    call: noop
"#;
        let config = WorkflowConfig::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than one outgoing"));
    }

    #[test]
    fn cycles_are_rejected() {
        let yaml = r#"
name: cyclic
start: a
places: [a, b]
transitions:
  - name: forward
    from: a
    to: b
    call: noop
  - name: back
    from: b
    to: a
    call: noop
"#;
        let config = WorkflowConfig::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("loop"));
    }

    #[test]
    fn duplicate_transition_names_fail_validation() {
        let yaml = r#"
name: duplicated
start: a
places: [a, b, c]
transitions:
  - name: step
    from: a
    to: b
    call: noop
  - name: step
    from: b
    to: c
    call: noop
"#;
        let config = WorkflowConfig::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
