//! # Devtools Heuristics
//!
//! No browser reports devtools reliably, so two weak signals are combined:
//!
//! - a console probe whose getter only runs when the console renders it
//! - the viewport gap: outer minus inner size above
//!   [`DEVTOOLS_GAP_THRESHOLD_PX`] on either axis
//!
//! Either one emits a single CRITICAL event and latches. A viewport sample
//! under the threshold re-arms the latch.
//!
//! The opening shortcuts (F12, Ctrl+Shift+I, Ctrl+Shift+J, Ctrl+U) are
//! always intercepted and reported as HIGH.

use shared_types::{Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, KeyChord, Observation, UiDirective};

pub const DEVTOOLS_GAP_THRESHOLD_PX: u32 = 160;

const OPENED_TOAST: &str =
    "DEVELOPER TOOLS DETECTED! Close dev tools immediately or you will be disqualified!";

#[derive(Debug, Default)]
pub struct DevtoolsDetector {
    latched: bool,
}

impl DevtoolsDetector {
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    fn opened(&mut self, description: &str, out: &mut Observation) {
        if self.latched {
            return;
        }
        self.latched = true;
        out.detect(Detection::new(
            ViolationKind::DevtoolsOpened,
            Severity::Critical,
            description,
        ));
        out.show(UiDirective::critical(OPENED_TOAST));
    }
}

/// Description and toast for a blocked devtools shortcut.
fn blocked_shortcut(chord: &KeyChord) -> Option<(&'static str, &'static str)> {
    if chord.is("F12") {
        return Some(("F12 pressed", "Developer tools are disabled!"));
    }
    if chord.ctrl && chord.shift && chord.is("I") {
        return Some(("Ctrl+Shift+I pressed", "Inspect element is disabled!"));
    }
    if chord.ctrl && chord.shift && chord.is("J") {
        return Some(("Ctrl+Shift+J pressed", "Console is disabled!"));
    }
    if chord.ctrl && !chord.shift && chord.is("U") {
        return Some(("Ctrl+U pressed", "View source is disabled!"));
    }
    None
}

impl Detector for DevtoolsDetector {
    fn name(&self) -> &'static str {
        "devtools"
    }

    fn observe(&mut self, signal: &BrowserSignal, _now: Timestamp, out: &mut Observation) {
        match signal {
            BrowserSignal::KeyDown(chord) => {
                if let Some((description, toast)) = blocked_shortcut(chord) {
                    out.prevent_default();
                    out.detect(Detection::new(
                        ViolationKind::DevtoolsOpened,
                        Severity::High,
                        description,
                    ));
                    out.show(UiDirective::warning(toast));
                }
            }
            BrowserSignal::DevtoolsProbe => self.opened("Developer tools opened", out),
            BrowserSignal::ViewportMeasured {
                outer_width,
                inner_width,
                outer_height,
                inner_height,
            } => {
                let gap = outer_width
                    .saturating_sub(*inner_width)
                    .max(outer_height.saturating_sub(*inner_height));
                if gap > DEVTOOLS_GAP_THRESHOLD_PX {
                    self.opened("Developer tools opened (viewport gap)", out);
                } else {
                    self.latched = false;
                }
            }
            _ => {}
        }
    }
}
