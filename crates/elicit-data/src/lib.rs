//! Elicit Data crate - dataset access for recorded study sessions.
//!
//! Provides the `DataAccess` trait for enumerating participants and loading
//! their event sequences and screen-recording locations, an `FsDataLoader`
//! reading the on-disk dataset layout, and a `MockDataAccess` for tests.

pub mod fs;

use std::collections::HashMap;
use std::path::PathBuf;

use elicit_core::error::{ElicitError, Result};
use elicit_core::types::EventSequence;

pub use fs::FsDataLoader;

/// Read-only access to one recorded-study dataset.
///
/// Implementations own the storage layout; the pipeline only sees
/// participant ids, event sequences, and video locators. Enumeration order
/// is not guaranteed.
pub trait DataAccess {
    /// List all participant ids present in the dataset.
    fn list_participants(&self) -> Result<Vec<String>>;

    /// Load the event sequence for one participant.
    ///
    /// Returns `Ok(None)` when the participant has no recorded events; the
    /// pipeline skips such participants rather than failing the run.
    fn load_event_sequence(&self, participant_id: &str) -> Result<Option<EventSequence>>;

    /// Locate the participant's screen recording, if one exists.
    fn video_path(&self, participant_id: &str) -> Option<PathBuf>;
}

/// Mock dataset for testing.
///
/// Serves sequences and video paths from in-memory maps, listing
/// participants in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MockDataAccess {
    order: Vec<String>,
    sequences: HashMap<String, EventSequence>,
    videos: HashMap<String, PathBuf>,
    unreadable: Vec<String>,
}

impl MockDataAccess {
    /// Create an empty mock dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant with an event sequence.
    pub fn with_sequence(mut self, sequence: EventSequence) -> Self {
        let id = sequence.participant_id.clone();
        self.order.push(id.clone());
        self.sequences.insert(id, sequence);
        self
    }

    /// Add a participant that has no event sequence at all.
    pub fn with_missing_sequence(mut self, participant_id: &str) -> Self {
        self.order.push(participant_id.to_string());
        self
    }

    /// Add a participant whose event log cannot be read.
    pub fn with_unreadable_sequence(mut self, participant_id: &str) -> Self {
        self.order.push(participant_id.to_string());
        self.unreadable.push(participant_id.to_string());
        self
    }

    /// Attach a video path to a participant.
    pub fn with_video(mut self, participant_id: &str, path: PathBuf) -> Self {
        self.videos.insert(participant_id.to_string(), path);
        self
    }
}

impl DataAccess for MockDataAccess {
    fn list_participants(&self) -> Result<Vec<String>> {
        Ok(self.order.clone())
    }

    fn load_event_sequence(&self, participant_id: &str) -> Result<Option<EventSequence>> {
        if self.unreadable.iter().any(|id| id == participant_id) {
            return Err(ElicitError::Data(format!(
                "events file for '{}' is not a JSON array",
                participant_id
            )));
        }
        Ok(self.sequences.get(participant_id).cloned())
    }

    fn video_path(&self, participant_id: &str) -> Option<PathBuf> {
        self.videos.get(participant_id).cloned()
    }
}
