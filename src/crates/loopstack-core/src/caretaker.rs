//! Run history
//!
//! The [`Caretaker`] keeps an ordered, append-only record of every
//! transition a run fires. Each [`Memento`] pairs transition metadata (the
//! place entered, the transition name, a step counter, a timestamp) with a
//! snapshot of run state taken after the transition's effects were applied.
//!
//! History belongs to a single run and is returned to the caller inside the
//! run result; concurrent runs never share a caretaker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata describing one fired transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MementoMetadata {
    /// Place the transition entered
    pub place: String,

    /// Name of the fired transition
    pub transition: String,

    /// Zero-based position of this entry in the run
    pub step: u32,

    /// When the transition completed
    pub ts: DateTime<Utc>,
}

/// One history entry: metadata plus a state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memento {
    /// Transition metadata
    pub metadata: MementoMetadata,

    /// Run state after the transition's effects were applied
    pub state: Value,
}

/// Append-only keeper of a run's history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Caretaker {
    mementos: Vec<Memento>,
}

impl Caretaker {
    /// Create an empty caretaker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fired transition
    ///
    /// `state` is the run state after the transition's effects. The step
    /// counter and timestamp are assigned here.
    pub fn record(
        &mut self,
        place: impl Into<String>,
        transition: impl Into<String>,
        state: Value,
    ) {
        let step = self.mementos.len() as u32;
        self.mementos.push(Memento {
            metadata: MementoMetadata {
                place: place.into(),
                transition: transition.into(),
                step,
                ts: Utc::now(),
            },
            state,
        });
    }

    /// All entries, in execution order
    pub fn history(&self) -> &[Memento] {
        &self.mementos
    }

    /// Places entered, in execution order
    pub fn places(&self) -> Vec<&str> {
        self.mementos
            .iter()
            .map(|m| m.metadata.place.as_str())
            .collect()
    }

    /// The most recent entry
    pub fn last(&self) -> Option<&Memento> {
        self.mementos.last()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }
}
