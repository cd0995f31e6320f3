//! Screenshot shortcuts. Best effort only: the OS sees these keys first.

use shared_types::{Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, KeyChord, Observation, UiDirective};

const TOAST: &str = "Screenshots are not allowed!";

#[derive(Debug, Default)]
pub struct ScreenshotDetector;

/// Cmd+Shift+3/4/5 on macOS, Win+Shift+S on Windows.
fn is_platform_shortcut(chord: &KeyChord) -> bool {
    chord.meta && chord.shift && ["3", "4", "5", "S"].iter().any(|key| chord.is(key))
}

impl Detector for ScreenshotDetector {
    fn name(&self) -> &'static str {
        "screenshot"
    }

    fn observe(&mut self, signal: &BrowserSignal, _now: Timestamp, out: &mut Observation) {
        match signal {
            // PrintScreen never reaches keydown on most platforms.
            BrowserSignal::KeyUp(chord) if chord.is("PrintScreen") => {
                out.detect(Detection::new(
                    ViolationKind::SuspiciousActivity,
                    Severity::High,
                    "Print Screen key pressed",
                ));
                out.show(UiDirective::ClearClipboard);
                out.show(UiDirective::warning(TOAST));
            }
            BrowserSignal::KeyDown(chord) if is_platform_shortcut(chord) => {
                out.prevent_default();
                out.detect(Detection::new(
                    ViolationKind::SuspiciousActivity,
                    Severity::High,
                    "Screenshot shortcut pressed",
                ));
                out.show(UiDirective::warning(TOAST));
            }
            _ => {}
        }
    }
}
