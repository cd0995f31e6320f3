//! Document visibility. Fires alongside the focus detector for one real
//! switch; both reports are kept.

use shared_types::{Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, Observation};

#[derive(Debug, Default)]
pub struct VisibilityDetector;

impl Detector for VisibilityDetector {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn observe(&mut self, signal: &BrowserSignal, _now: Timestamp, out: &mut Observation) {
        if let BrowserSignal::VisibilityChanged { hidden: true } = signal {
            out.detect(Detection::new(
                ViolationKind::TabSwitch,
                Severity::High,
                "Tab became hidden",
            ));
        }
    }
}
