//! Fullscreen requirement. Exiting is reported after the fact; the prompt is
//! an overlay only.

use shared_types::{ExamPolicy, Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, Observation, UiDirective};

#[derive(Debug, Default)]
pub struct FullscreenDetector {
    prompted_on_click: bool,
}

impl Detector for FullscreenDetector {
    fn name(&self) -> &'static str {
        "fullscreen"
    }

    fn is_armed(&self, policy: &ExamPolicy) -> bool {
        policy.require_full_screen
    }

    fn observe(&mut self, signal: &BrowserSignal, _now: Timestamp, out: &mut Observation) {
        match signal {
            BrowserSignal::FullscreenChanged { is_fullscreen: false } => {
                out.detect(Detection::new(
                    ViolationKind::FullscreenExit,
                    Severity::High,
                    "Exited fullscreen mode",
                ));
                out.show(UiDirective::ShowFullscreenPrompt);
            }
            BrowserSignal::FullscreenChanged { is_fullscreen: true } => {
                out.show(UiDirective::HideFullscreenPrompt);
            }
            // Browsers only grant fullscreen from a user gesture, so the
            // first click outside fullscreen asks for it.
            BrowserSignal::Click { is_fullscreen: false } if !self.prompted_on_click => {
                self.prompted_on_click = true;
                out.show(UiDirective::ShowFullscreenPrompt);
            }
            _ => {}
        }
    }
}
