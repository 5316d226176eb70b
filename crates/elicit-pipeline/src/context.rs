//! Prompt and frame-name assembly for detected anomalies.
//!
//! The builder is deterministic: the same task, anomaly, and frame path
//! always produce byte-identical prompts, so both sink formats are stable
//! across runs.

use std::path::Path;

use elicit_core::types::{Anomaly, ContextBundle, TaskDefinition};

/// Assembles the per-anomaly context bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Name hint for the extracted frame of one anomaly.
    pub fn frame_name(participant_id: &str, timestamp_ms: u64) -> String {
        format!("{}_{}.jpg", participant_id, timestamp_ms)
    }

    /// Build the prompt bundle for one anomaly.
    ///
    /// `frame_path` is `None` when extraction failed or no recording exists;
    /// the prompt then carries an explicit note instead of an image
    /// reference.
    pub fn build(
        &self,
        task: &TaskDefinition,
        anomaly: &Anomaly,
        frame_path: Option<&Path>,
    ) -> ContextBundle {
        let snapshot_line = match frame_path {
            Some(path) => format!("- Screenshot: {}", path.display()),
            None => "- Screenshot: no screenshot available".to_string(),
        };

        let prompt = format!(
            "Task Context:\n\
             - Objective: {}\n\
             - Expected actions: {}\n\
             \n\
             Observed Anomaly:\n\
             - Type: {}\n\
             - Timestamp: {}ms\n\
             - UI Element: {}\n\
             - Evidence: {}\n\
             {}\n\
             \n\
             Instruction:\n\
             Based on the task context and the observed interaction anomaly, \
             suggest software requirements that would prevent or mitigate this \
             user difficulty. Provide a numbered list; for each suggestion name \
             the target UI element and give a rationale grounded in the \
             evidence above.",
            task.objective,
            task.expected_actions,
            anomaly.kind,
            anomaly.timestamp_ms,
            anomaly.target,
            anomaly.evidence,
            snapshot_line,
        );

        ContextBundle {
            frame_path: frame_path.map(|p| p.to_path_buf()),
            prompt,
        }
    }
}
