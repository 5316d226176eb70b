//! Filesystem dataset loader.
//!
//! Expected layout, one directory per participant under the dataset root:
//!
//! ```text
//! dataset/
//!   P01/
//!     events.json   # array of interaction events
//!     screen.mp4    # synchronized screen recording
//!   P02/
//!     ...
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use elicit_core::error::{ElicitError, Result};
use elicit_core::types::{Event, EventSequence};

use crate::DataAccess;

/// Name of the per-participant event log file.
const EVENTS_FILE: &str = "events.json";
/// Name of the per-participant screen recording.
const VIDEO_FILE: &str = "screen.mp4";

/// Loads a recorded-study dataset from a directory tree.
#[derive(Debug, Clone)]
pub struct FsDataLoader {
    dataset_root: PathBuf,
}

impl FsDataLoader {
    /// Create a loader rooted at the given dataset directory.
    pub fn new(dataset_root: impl Into<PathBuf>) -> Self {
        Self {
            dataset_root: dataset_root.into(),
        }
    }

    fn participant_dir(&self, participant_id: &str) -> PathBuf {
        self.dataset_root.join(participant_id)
    }

    /// Parse an events file leniently: individually malformed entries are
    /// skipped, a structurally invalid file is an error.
    fn parse_events(&self, participant_id: &str, content: &str) -> Result<Vec<Event>> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(content).map_err(|e| {
            ElicitError::Data(format!(
                "events file for '{}' is not a JSON array: {}",
                participant_id, e
            ))
        })?;

        let mut events = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;
        for value in raw {
            match serde_json::from_value::<Event>(value) {
                Ok(event) => events.push(event),
                Err(e) => {
                    skipped += 1;
                    debug!(participant = participant_id, error = %e, "Skipping malformed event entry");
                }
            }
        }
        if skipped > 0 {
            warn!(
                participant = participant_id,
                skipped, "Malformed event entries skipped"
            );
        }
        Ok(events)
    }
}

impl DataAccess for FsDataLoader {
    fn list_participants(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dataset_root).map_err(|e| {
            ElicitError::Data(format!(
                "cannot read dataset root {}: {}",
                self.dataset_root.display(),
                e
            ))
        })?;

        let mut participants = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                participants.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        // Directory iteration order is platform-dependent; sort so runs over
        // the same dataset log participants consistently.
        participants.sort();
        Ok(participants)
    }

    fn load_event_sequence(&self, participant_id: &str) -> Result<Option<EventSequence>> {
        let path = self.participant_dir(participant_id).join(EVENTS_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let events = self.parse_events(participant_id, &content)?;
        Ok(Some(EventSequence::new(participant_id, events)))
    }

    fn video_path(&self, participant_id: &str) -> Option<PathBuf> {
        let path = self.participant_dir(participant_id).join(VIDEO_FILE);
        path.exists().then_some(path)
    }
}

/// Convenience check used by the app at startup.
pub fn dataset_exists(dataset_root: &Path) -> bool {
    dataset_root.is_dir()
}
