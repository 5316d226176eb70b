//! Shared domain types for the elicitation pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of a recorded interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    KeyInput,
    Navigation,
    Scroll,
    /// Any event kind the pipeline does not interpret.
    #[serde(other)]
    Other,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Click => write!(f, "click"),
            EventKind::KeyInput => write!(f, "key_input"),
            EventKind::Navigation => write!(f, "navigation"),
            EventKind::Scroll => write!(f, "scroll"),
            EventKind::Other => write!(f, "other"),
        }
    }
}

/// One recorded interaction event.
///
/// Timestamps are milliseconds from the start of the participant's session
/// and are non-decreasing within a sequence. `duration_ms` is how long the
/// element was held/focused or the UI stayed unresponsive, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp_ms: u64,
    pub kind: EventKind,
    pub target: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl Event {
    /// A malformed event carries no usable target and is ignored by the
    /// detector.
    pub fn is_well_formed(&self) -> bool {
        !self.target.is_empty()
    }
}

/// Ordered interaction events for exactly one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSequence {
    pub participant_id: String,
    pub events: Vec<Event>,
}

impl EventSequence {
    pub fn new(participant_id: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            participant_id: participant_id.into(),
            events,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Kind of a flagged interaction moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AnomalyKind {
    RepetitiveClick,
    LongDuration,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::RepetitiveClick => write!(f, "Repetitive Click"),
            AnomalyKind::LongDuration => write!(f, "Long Duration"),
        }
    }
}

/// Supporting facts for a detected anomaly, in a form the context builder
/// can render verbatim into a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyEvidence {
    RepetitiveClick { click_count: u32 },
    LongDuration { duration_ms: u64, threshold_ms: u64 },
}

impl fmt::Display for AnomalyEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyEvidence::RepetitiveClick { click_count } => {
                write!(f, "{} consecutive clicks on the same element", click_count)
            }
            AnomalyEvidence::LongDuration {
                duration_ms,
                threshold_ms,
            } => write!(
                f,
                "element engaged for {} ms (threshold {} ms)",
                duration_ms, threshold_ms
            ),
        }
    }
}

/// A flagged interaction moment.
///
/// Produced exclusively by the detector and immutable afterward. The
/// timestamp is the triggering event's time (for click clusters, the event
/// that crossed the threshold).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub timestamp_ms: u64,
    pub target: String,
    pub evidence: AnomalyEvidence,
}

/// Static description of the task a participant was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// What the user was trying to achieve, in free text.
    pub objective: String,
    /// The expected action sequence, as a textual description.
    pub expected_actions: String,
}

/// The assembled context for one anomaly: a visual snapshot reference (if
/// extraction succeeded) plus the full prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBundle {
    pub frame_path: Option<PathBuf>,
    pub prompt: String,
}

/// One row of the API-mode result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementRecord {
    pub participant_id: String,
    pub timestamp_ms: u64,
    pub anomaly_kind: AnomalyKind,
    pub inferred_text: String,
}
