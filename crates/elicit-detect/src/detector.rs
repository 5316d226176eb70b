//! Rule-based anomaly detection.
//!
//! Two independent rules run in a single in-order pass:
//! - **RepetitiveClick**: a run of consecutive clicks on one target, with no
//!   intervening event on a different target, reaching the configured count.
//! - **LongDuration**: any single event whose duration strictly exceeds the
//!   configured threshold.
//!
//! When both rules resolve at the same event, the repetitive-click anomaly
//! is emitted first.

use tracing::debug;

use elicit_core::config::DetectionConfig;
use elicit_core::types::{Anomaly, AnomalyEvidence, AnomalyKind, Event, EventKind, EventSequence};

/// Detects anomalous interaction moments in an event sequence.
pub struct AnomalyDetector {
    config: DetectionConfig,
}

impl AnomalyDetector {
    /// Create a detector with the given thresholds.
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Scan a sequence and return anomalies in detection order.
    ///
    /// Malformed events (empty target) are ignored entirely: they neither
    /// count toward a click run nor break one. An empty sequence yields an
    /// empty result.
    pub fn detect(&self, sequence: &EventSequence) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        let mut run_target: Option<&str> = None;
        let mut run_count: u32 = 0;

        for event in &sequence.events {
            if !event.is_well_formed() {
                debug!(
                    participant = %sequence.participant_id,
                    timestamp_ms = event.timestamp_ms,
                    "Skipping malformed event"
                );
                continue;
            }

            if event.kind == EventKind::Click {
                if run_target == Some(event.target.as_str()) {
                    run_count += 1;
                } else {
                    run_target = Some(event.target.as_str());
                    run_count = 1;
                }
                if run_count == self.config.repetitive_click_threshold {
                    anomalies.push(Anomaly {
                        kind: AnomalyKind::RepetitiveClick,
                        timestamp_ms: event.timestamp_ms,
                        target: event.target.clone(),
                        evidence: AnomalyEvidence::RepetitiveClick {
                            click_count: run_count,
                        },
                    });
                    // Only the threshold-crossing instant is flagged; the run
                    // starts counting again from zero.
                    run_count = 0;
                }
            } else if run_target != Some(event.target.as_str()) {
                // An intervening event on a different target breaks the run.
                run_target = None;
                run_count = 0;
            }

            if let Some(anomaly) = self.check_long_duration(event) {
                anomalies.push(anomaly);
            }
        }

        anomalies
    }

    fn check_long_duration(&self, event: &Event) -> Option<Anomaly> {
        let duration_ms = event.duration_ms?;
        if duration_ms <= self.config.long_duration_threshold_ms {
            return None;
        }
        Some(Anomaly {
            kind: AnomalyKind::LongDuration,
            timestamp_ms: event.timestamp_ms,
            target: event.target.clone(),
            evidence: AnomalyEvidence::LongDuration {
                duration_ms,
                threshold_ms: self.config.long_duration_threshold_ms,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(DetectionConfig::default())
    }

    fn click(ts: u64, target: &str) -> Event {
        Event {
            timestamp_ms: ts,
            kind: EventKind::Click,
            target: target.to_string(),
            duration_ms: None,
        }
    }

    fn click_with_duration(ts: u64, target: &str, duration_ms: u64) -> Event {
        Event {
            duration_ms: Some(duration_ms),
            ..click(ts, target)
        }
    }

    fn key_input(ts: u64, target: &str) -> Event {
        Event {
            timestamp_ms: ts,
            kind: EventKind::KeyInput,
            target: target.to_string(),
            duration_ms: None,
        }
    }

    fn seq(events: Vec<Event>) -> EventSequence {
        EventSequence::new("P01", events)
    }

    // ---- Empty / quiet sequences ----

    #[test]
    fn test_empty_sequence_yields_no_anomalies() {
        assert!(detector().detect(&seq(vec![])).is_empty());
    }

    #[test]
    fn test_quiet_sequence_yields_no_anomalies() {
        let events = vec![
            click(0, "a"),
            click(100, "b"),
            key_input(200, "field"),
            click_with_duration(300, "c", 4000),
        ];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    // ---- Repetitive clicks ----

    #[test]
    fn test_threshold_clicks_produce_one_anomaly() {
        let events = vec![click(0, "A"), click(100, "A"), click(200, "A")];
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::RepetitiveClick);
        assert_eq!(anomalies[0].timestamp_ms, 200);
        assert_eq!(anomalies[0].target, "A");
        assert_eq!(
            anomalies[0].evidence,
            AnomalyEvidence::RepetitiveClick { click_count: 3 }
        );
    }

    #[test]
    fn test_threshold_minus_one_clicks_produce_none() {
        let events = vec![click(0, "A"), click(100, "A")];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    #[test]
    fn test_unbroken_run_flags_only_threshold_crossings() {
        // Six consecutive clicks: flagged at the 3rd and the 6th, not 4th/5th.
        let events = (0..6).map(|i| click(i * 100, "A")).collect();
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].timestamp_ms, 200);
        assert_eq!(anomalies[1].timestamp_ms, 500);
    }

    #[test]
    fn test_different_target_click_resets_run() {
        let events = vec![click(0, "A"), click(100, "A"), click(200, "B"), click(300, "A")];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    #[test]
    fn test_non_click_on_different_target_breaks_run() {
        let events = vec![
            click(0, "A"),
            click(100, "A"),
            key_input(200, "field"),
            click(300, "A"),
        ];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    #[test]
    fn test_non_click_on_same_target_does_not_break_run() {
        let events = vec![
            click(0, "A"),
            click(100, "A"),
            key_input(200, "A"),
            click(300, "A"),
        ];
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].timestamp_ms, 300);
    }

    #[test]
    fn test_custom_click_threshold() {
        let det = AnomalyDetector::new(DetectionConfig {
            repetitive_click_threshold: 2,
            long_duration_threshold_ms: 5000,
        });
        let events = vec![click(0, "A"), click(100, "A"), click(200, "A"), click(300, "A")];
        let anomalies = det.detect(&seq(events));
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].timestamp_ms, 100);
        assert_eq!(anomalies[1].timestamp_ms, 300);
    }

    // ---- Long durations ----

    #[test]
    fn test_duration_above_threshold_flags() {
        let events = vec![click_with_duration(50, "B", 6000)];
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::LongDuration);
        assert_eq!(anomalies[0].timestamp_ms, 50);
        assert_eq!(
            anomalies[0].evidence,
            AnomalyEvidence::LongDuration {
                duration_ms: 6000,
                threshold_ms: 5000,
            }
        );
    }

    #[test]
    fn test_duration_exactly_at_threshold_does_not_flag() {
        let events = vec![click_with_duration(50, "B", 5000)];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    #[test]
    fn test_duration_one_ms_over_threshold_flags() {
        let events = vec![click_with_duration(50, "B", 5001)];
        assert_eq!(detector().detect(&seq(events)).len(), 1);
    }

    #[test]
    fn test_zero_or_absent_duration_never_flags() {
        let events = vec![click_with_duration(0, "B", 0), click(100, "B")];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    #[test]
    fn test_long_duration_on_non_click_event() {
        let events = vec![Event {
            timestamp_ms: 10,
            kind: EventKind::Navigation,
            target: "page_upload".to_string(),
            duration_ms: Some(9000),
        }];
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::LongDuration);
    }

    // ---- Rule interaction ----

    #[test]
    fn test_both_rules_at_same_event_click_rule_first() {
        let events = vec![
            click(0, "A"),
            click(100, "A"),
            click_with_duration(200, "A", 7000),
        ];
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].kind, AnomalyKind::RepetitiveClick);
        assert_eq!(anomalies[1].kind, AnomalyKind::LongDuration);
        assert_eq!(anomalies[0].timestamp_ms, anomalies[1].timestamp_ms);
    }

    #[test]
    fn test_long_duration_below_click_threshold_flags_only_duration() {
        // One slow click that is not part of a long enough run.
        let events = vec![click(0, "A"), click_with_duration(50, "B", 6000)];
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::LongDuration);
        assert_eq!(anomalies[0].target, "B");
    }

    #[test]
    fn test_anomalies_emitted_in_timestamp_order() {
        let events = vec![
            click_with_duration(0, "X", 8000),
            click(100, "A"),
            click(200, "A"),
            click(300, "A"),
            click_with_duration(400, "Y", 6000),
        ];
        let anomalies = detector().detect(&seq(events));
        let timestamps: Vec<u64> = anomalies.iter().map(|a| a.timestamp_ms).collect();
        assert_eq!(timestamps, vec![0, 300, 400]);
    }

    // ---- Malformed events ----

    #[test]
    fn test_malformed_event_is_ignored() {
        let events = vec![
            click(0, "A"),
            click(100, ""),
            click(200, "A"),
            click(300, "A"),
        ];
        // The empty-target click neither counts nor breaks the run on A.
        let anomalies = detector().detect(&seq(events));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].timestamp_ms, 300);
    }

    #[test]
    fn test_malformed_event_with_long_duration_is_ignored() {
        let events = vec![Event {
            timestamp_ms: 0,
            kind: EventKind::Click,
            target: String::new(),
            duration_ms: Some(60_000),
        }];
        assert!(detector().detect(&seq(events)).is_empty());
    }

    // ---- Determinism ----

    #[test]
    fn test_detect_is_deterministic() {
        let events = vec![
            click(0, "A"),
            click(100, "A"),
            click(200, "A"),
            click_with_duration(300, "B", 9000),
            click(400, "B"),
            click(500, "B"),
            click(600, "B"),
        ];
        let sequence = seq(events);
        let det = detector();
        let first = det.detect(&sequence);
        let second = det.detect(&sequence);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_detect_does_not_mutate_input() {
        let sequence = seq(vec![click(0, "A"), click(100, "A"), click(200, "A")]);
        let snapshot = sequence.clone();
        detector().detect(&sequence);
        assert_eq!(sequence, snapshot);
    }
}
