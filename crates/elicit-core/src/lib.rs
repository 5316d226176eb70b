//! Elicit core crate - configuration, error types, and the shared domain model.
//!
//! Everything the pipeline crates exchange lives here: interaction events,
//! detected anomalies, task definitions, context bundles, and the
//! requirement records that end up in the output table.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ElicitConfig, InteractionMode};
pub use error::{ElicitError, Result};
