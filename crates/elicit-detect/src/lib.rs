//! Elicit Detect crate - rule-based anomaly detection over event sequences.
//!
//! The detector is a pure function from one participant's ordered event
//! sequence to a list of flagged moments. It has no I/O and no shared state,
//! so identical input always yields identical ordered output.

pub mod detector;

pub use detector::AnomalyDetector;
