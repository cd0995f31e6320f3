//! Right-click.

use shared_types::{Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, Observation, UiDirective};

#[derive(Debug, Default)]
pub struct ContextMenuDetector;

impl Detector for ContextMenuDetector {
    fn name(&self) -> &'static str {
        "context_menu"
    }

    fn observe(&mut self, signal: &BrowserSignal, _now: Timestamp, out: &mut Observation) {
        if matches!(signal, BrowserSignal::ContextMenu) {
            out.prevent_default();
            out.detect(Detection::new(
                ViolationKind::RightClick,
                Severity::Low,
                "Right-clicked",
            ));
            out.show(UiDirective::warning("Right-click is disabled during the exam!"));
        }
    }
}
