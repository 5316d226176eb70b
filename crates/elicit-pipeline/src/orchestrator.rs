//! End-to-end run coordination.
//!
//! Walks the dataset participant by participant, detects anomalies, builds
//! context bundles, optionally runs inference, and feeds every outcome to a
//! result sink. Processing is sequential; given deterministic collaborators
//! the artifacts are byte-identical across runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use elicit_core::config::{InteractionMode, TasksConfig};
use elicit_data::DataAccess;
use elicit_detect::AnomalyDetector;
use elicit_frame::FrameExtractor;
use elicit_llm::DynInferenceService;

use crate::context::ContextBuilder;
use crate::error::PipelineError;
use crate::sink::{AnomalyOutcome, ResultSink};

/// Outcome counts for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub mode: InteractionMode,
    pub participants_processed: usize,
    pub participants_skipped: usize,
    pub anomalies_found: usize,
    pub records_written: usize,
    pub inference_failures: usize,
}

impl RunSummary {
    fn new(mode: InteractionMode) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            mode,
            participants_processed: 0,
            participants_skipped: 0,
            anomalies_found: 0,
            records_written: 0,
            inference_failures: 0,
        }
    }
}

/// Drives one elicitation run over a dataset.
pub struct Orchestrator<D, F> {
    data: D,
    extractor: F,
    detector: AnomalyDetector,
    context: ContextBuilder,
    inference: Option<Box<dyn DynInferenceService>>,
    tasks: TasksConfig,
    mode: InteractionMode,
    output_dir: PathBuf,
}

impl<D: DataAccess, F: FrameExtractor> Orchestrator<D, F> {
    /// Wire up a run.
    ///
    /// `inference` must be `Some` in API mode; manual mode never calls it.
    pub fn new(
        data: D,
        extractor: F,
        detector: AnomalyDetector,
        inference: Option<Box<dyn DynInferenceService>>,
        tasks: TasksConfig,
        mode: InteractionMode,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data,
            extractor,
            detector,
            context: ContextBuilder::new(),
            inference,
            tasks,
            mode,
            output_dir: output_dir.into(),
        }
    }

    /// Process every participant and feed outcomes to the sink.
    pub async fn run<S: ResultSink>(&self, sink: &mut S) -> Result<RunSummary, PipelineError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            PipelineError::OutputDir(format!(
                "cannot create {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let mut summary = RunSummary::new(self.mode);
        info!(run_id = %summary.run_id, mode = ?self.mode, "Starting elicitation run");

        let participants = self
            .data
            .list_participants()
            .map_err(|e| PipelineError::Data(e.to_string()))?;

        for participant_id in &participants {
            let sequence = match self.data.load_event_sequence(participant_id) {
                Ok(Some(seq)) if !seq.is_empty() => seq,
                Ok(Some(_)) => {
                    info!(participant = %participant_id, "No events recorded, skipping");
                    summary.participants_skipped += 1;
                    continue;
                }
                Ok(None) => {
                    info!(participant = %participant_id, "No event log found, skipping");
                    summary.participants_skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(
                        participant = %participant_id,
                        error = %e,
                        "Unreadable event log, skipping"
                    );
                    summary.participants_skipped += 1;
                    continue;
                }
            };

            let task = match self.tasks.resolve(participant_id) {
                Some(task) => task,
                None => {
                    // Unreachable after config validation; skip rather than abort.
                    warn!(participant = %participant_id, "No task definition resolvable, skipping");
                    summary.participants_skipped += 1;
                    continue;
                }
            };

            let anomalies = self.detector.detect(&sequence);
            info!(
                participant = %participant_id,
                anomalies = anomalies.len(),
                "Participant processed"
            );
            summary.participants_processed += 1;
            summary.anomalies_found += anomalies.len();

            for anomaly in &anomalies {
                let frame_path = match self.data.video_path(participant_id) {
                    Some(video) => {
                        let hint = ContextBuilder::frame_name(participant_id, anomaly.timestamp_ms);
                        match self.extractor.extract(&video, anomaly.timestamp_ms, &hint).await {
                            Ok(path) => Some(path),
                            Err(e) => {
                                warn!(
                                    participant = %participant_id,
                                    timestamp_ms = anomaly.timestamp_ms,
                                    error = %e,
                                    "Frame extraction failed, continuing without snapshot"
                                );
                                None
                            }
                        }
                    }
                    None => {
                        warn!(
                            participant = %participant_id,
                            "No screen recording, continuing without snapshot"
                        );
                        None
                    }
                };

                let bundle = self.context.build(task, anomaly, frame_path.as_deref());

                let response = if self.mode == InteractionMode::Api {
                    match &self.inference {
                        Some(service) => match service.infer_boxed(&bundle.prompt).await {
                            Ok(text) => Some(text),
                            Err(e) => {
                                warn!(
                                    participant = %participant_id,
                                    timestamp_ms = anomaly.timestamp_ms,
                                    error = %e,
                                    "Inference failed for anomaly"
                                );
                                summary.inference_failures += 1;
                                None
                            }
                        },
                        None => {
                            return Err(PipelineError::Data(
                                "API mode requires an inference backend".to_string(),
                            ))
                        }
                    }
                } else {
                    None
                };

                let recorded = self.mode == InteractionMode::WebUi || response.is_some();
                let outcome = AnomalyOutcome {
                    participant_id: participant_id.clone(),
                    anomaly: anomaly.clone(),
                    bundle,
                    response,
                };
                sink.record(&outcome)?;
                if recorded {
                    summary.records_written += 1;
                }
            }
        }

        sink.finalize()?;
        info!(
            run_id = %summary.run_id,
            participants = summary.participants_processed,
            skipped = summary.participants_skipped,
            anomalies = summary.anomalies_found,
            records = summary.records_written,
            "Elicitation run complete"
        );
        Ok(summary)
    }
}
