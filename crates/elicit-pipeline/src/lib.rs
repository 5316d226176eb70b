//! Elicit Pipeline crate - from detected anomalies to run artifacts.
//!
//! Home of the `ContextBuilder` that turns an anomaly plus task context into
//! an LLM prompt, the `ResultSink` implementations for both interaction
//! modes, and the `Orchestrator` that drives a complete run.

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod sink;

pub use context::ContextBuilder;
pub use error::PipelineError;
pub use orchestrator::{Orchestrator, RunSummary};
pub use sink::{AnomalyOutcome, CsvSink, GuideSink, ResultSink};
