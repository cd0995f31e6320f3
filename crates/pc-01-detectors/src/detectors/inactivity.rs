//! Inactivity: one report per silence longer than
//! [`INACTIVITY_THRESHOLD_MS`]. Activity re-arms it.

use shared_types::{Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, Observation};

/// Five minutes.
pub const INACTIVITY_THRESHOLD_MS: u64 = 5 * 60 * 1000;

#[derive(Debug)]
pub struct InactivityDetector {
    last_activity: Timestamp,
    reported: bool,
}

impl InactivityDetector {
    pub fn new(started_at: Timestamp) -> Self {
        Self {
            last_activity: started_at,
            reported: false,
        }
    }
}

impl Detector for InactivityDetector {
    fn name(&self) -> &'static str {
        "inactivity"
    }

    fn observe(&mut self, signal: &BrowserSignal, now: Timestamp, out: &mut Observation) {
        match signal {
            BrowserSignal::UserActivity { .. } => {
                self.last_activity = now;
                self.reported = false;
            }
            BrowserSignal::Tick => {
                let idle = now.saturating_sub(self.last_activity);
                if idle > INACTIVITY_THRESHOLD_MS && !self.reported {
                    self.reported = true;
                    let minutes = idle as f64 / 60_000.0;
                    out.detect(
                        Detection::new(
                            ViolationKind::SuspiciousActivity,
                            Severity::Medium,
                            format!("Inactive for {minutes:.1} minutes"),
                        )
                        .with_metadata("idleMs", idle),
                    );
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::observe_once;
    use crate::domain::ActivityInput;

    const MINUTE: u64 = 60_000;

    fn activity() -> BrowserSignal {
        BrowserSignal::UserActivity {
            input: ActivityInput::MouseMove,
        }
    }

    #[test]
    fn test_single_report_per_silence() {
        let mut detector = InactivityDetector::new(0);
        assert!(observe_once(&mut detector, BrowserSignal::Tick, 5 * MINUTE).is_empty());

        let out = observe_once(&mut detector, BrowserSignal::Tick, 6 * MINUTE);
        assert_eq!(out.detections.len(), 1);
        assert_eq!(out.detections[0].severity, Severity::Medium);
        assert_eq!(out.detections[0].description, "Inactive for 6.0 minutes");

        for minute in 7..20 {
            assert!(observe_once(&mut detector, BrowserSignal::Tick, minute * MINUTE).is_empty());
        }
    }

    #[test]
    fn test_activity_rearms() {
        let mut detector = InactivityDetector::new(0);
        observe_once(&mut detector, BrowserSignal::Tick, 6 * MINUTE);
        observe_once(&mut detector, activity(), 7 * MINUTE);

        assert!(observe_once(&mut detector, BrowserSignal::Tick, 11 * MINUTE).is_empty());
        assert_eq!(
            observe_once(&mut detector, BrowserSignal::Tick, 13 * MINUTE).detections.len(),
            1
        );
    }
}
