//! Result sinks for the two interaction modes.
//!
//! - `CsvSink` (API mode) accumulates inferred-requirement rows and writes
//!   one CSV table at finalize.
//! - `GuideSink` (manual mode) appends one markdown section per anomaly to
//!   a guide document a human works through in a chat UI. Each append is an
//!   open-write-close cycle so a crash mid-run leaves every completed
//!   section on disk.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use elicit_core::types::{Anomaly, ContextBundle, RequirementRecord};

use crate::error::PipelineError;

/// Output file name for the API-mode result table.
pub const RESULTS_FILE: &str = "inferred_requirements.csv";
/// Output file name for the manual-mode guide document.
pub const GUIDE_FILE: &str = "manual_interaction_guide.md";

const GUIDE_HEADER: &str = "# Manual Interaction Guide for ChatGPT Web UI\n\n\
This document contains the prompts and images needed to reproduce the study using the ChatGPT Web UI.\n\
For each anomaly, copy the prompt and paste it into a new chat session (or continue if appropriate), and refer to the image if your model supports vision.\n\n";

/// Everything the pipeline produced for one anomaly.
#[derive(Debug, Clone)]
pub struct AnomalyOutcome {
    pub participant_id: String,
    pub anomaly: Anomaly,
    pub bundle: ContextBundle,
    /// Model response; present only in API mode after successful inference.
    pub response: Option<String>,
}

/// Destination for per-anomaly outcomes.
pub trait ResultSink {
    /// Record one outcome.
    fn record(&mut self, outcome: &AnomalyOutcome) -> Result<(), PipelineError>;

    /// Flush any buffered output. Called once, after all participants.
    fn finalize(&mut self) -> Result<(), PipelineError>;
}

// ---------------------------------------------------------------------------
// CsvSink - API mode result table
// ---------------------------------------------------------------------------

/// Accumulates requirement rows and writes them as one CSV on finalize.
#[derive(Debug)]
pub struct CsvSink {
    output_path: PathBuf,
    records: Vec<RequirementRecord>,
}

impl CsvSink {
    /// Create a sink writing `inferred_requirements.csv` under the output
    /// directory.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_path: output_dir.join(RESULTS_FILE),
            records: Vec::new(),
        }
    }

    /// Number of rows recorded so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResultSink for CsvSink {
    fn record(&mut self, outcome: &AnomalyOutcome) -> Result<(), PipelineError> {
        // Only successful inferences become rows; failures are counted by
        // the orchestrator, not fabricated here.
        if let Some(response) = &outcome.response {
            self.records.push(RequirementRecord {
                participant_id: outcome.participant_id.clone(),
                timestamp_ms: outcome.anomaly.timestamp_ms,
                anomaly_kind: outcome.anomaly.kind,
                inferred_text: response.clone(),
            });
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), PipelineError> {
        let mut writer = csv::Writer::from_path(&self.output_path)
            .map_err(|e| PipelineError::Sink(format!("cannot create result table: {}", e)))?;

        writer
            .write_record(["Participant", "Timestamp", "Anomaly Type", "LLM Response"])
            .map_err(|e| PipelineError::Sink(e.to_string()))?;
        for record in &self.records {
            writer
                .write_record([
                    record.participant_id.as_str(),
                    &record.timestamp_ms.to_string(),
                    &record.anomaly_kind.to_string(),
                    record.inferred_text.as_str(),
                ])
                .map_err(|e| PipelineError::Sink(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| PipelineError::Sink(e.to_string()))?;

        info!(
            rows = self.records.len(),
            path = %self.output_path.display(),
            "Result table written"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GuideSink - manual mode markdown guide
// ---------------------------------------------------------------------------

/// Appends guide sections as outcomes arrive.
#[derive(Debug)]
pub struct GuideSink {
    guide_path: PathBuf,
    output_dir: PathBuf,
    sections: usize,
}

impl GuideSink {
    /// Create the guide document under the output directory, truncating any
    /// previous run's guide and writing the fixed header.
    pub fn new(output_dir: &Path) -> Result<Self, PipelineError> {
        let guide_path = output_dir.join(GUIDE_FILE);
        std::fs::write(&guide_path, GUIDE_HEADER)?;
        Ok(Self {
            guide_path,
            output_dir: output_dir.to_path_buf(),
            sections: 0,
        })
    }

    /// Path of the guide document.
    pub fn path(&self) -> &Path {
        &self.guide_path
    }

    /// Image references are relative to the output directory so the guide
    /// stays portable when the directory is moved.
    fn relative_frame(&self, frame: &Path) -> PathBuf {
        frame
            .strip_prefix(&self.output_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| frame.to_path_buf())
    }
}

impl ResultSink for GuideSink {
    fn record(&mut self, outcome: &AnomalyOutcome) -> Result<(), PipelineError> {
        let mut section = format!(
            "## Participant {} - Anomaly: {}\n**Timestamp**: {}ms\n\n",
            outcome.participant_id, outcome.anomaly.kind, outcome.anomaly.timestamp_ms
        );
        if let Some(frame) = &outcome.bundle.frame_path {
            section.push_str(&format!(
                "![GUI Snapshot]({})\n\n",
                self.relative_frame(frame).display()
            ));
        }
        section.push_str("**Copy the following prompt:**\n```text\n");
        section.push_str(&outcome.bundle.prompt);
        section.push_str("\n```\n\n---\n\n");

        let mut file = OpenOptions::new().append(true).open(&self.guide_path)?;
        file.write_all(section.as_bytes())?;
        self.sections += 1;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), PipelineError> {
        info!(
            sections = self.sections,
            path = %self.guide_path.display(),
            "Manual interaction guide complete"
        );
        Ok(())
    }
}
