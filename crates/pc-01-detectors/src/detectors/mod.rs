//! # Detectors
//!
//! Each detector watches one kind of signal and keeps its own state. None of
//! them decides disqualification; they only describe what happened.
//!
//! | Detector | Emits | Armed when |
//! |----------|-------|------------|
//! | `FocusDetector` | WINDOW_BLUR, TAB_SWITCH (HIGH) | always |
//! | `VisibilityDetector` | TAB_SWITCH (HIGH) | always |
//! | `ClipboardDetector` | COPY_ATTEMPT (MEDIUM), PASTE_ATTEMPT (HIGH) | `!allow_copy_paste` |
//! | `ContextMenuDetector` | RIGHT_CLICK (LOW) | always |
//! | `DevtoolsDetector` | DEVTOOLS_OPENED (CRITICAL probe, HIGH shortcut) | always |
//! | `FullscreenDetector` | FULLSCREEN_EXIT (HIGH) | `require_full_screen` |
//! | `InactivityDetector` | SUSPICIOUS_ACTIVITY (MEDIUM) | always |
//! | `ScreenshotDetector` | SUSPICIOUS_ACTIVITY (HIGH) | always |

mod clipboard;
mod context_menu;
mod devtools;
mod focus;
mod fullscreen;
mod inactivity;
mod screenshot;
mod visibility;

pub use clipboard::ClipboardDetector;
pub use context_menu::ContextMenuDetector;
pub use devtools::{DevtoolsDetector, DEVTOOLS_GAP_THRESHOLD_PX};
pub use focus::FocusDetector;
pub use fullscreen::FullscreenDetector;
pub use inactivity::{InactivityDetector, INACTIVITY_THRESHOLD_MS};
pub use screenshot::ScreenshotDetector;
pub use visibility::VisibilityDetector;

use shared_types::{ExamPolicy, Timestamp};

use crate::domain::{BrowserSignal, Observation};

/// A single independent monitor.
pub trait Detector: Send {
    /// Unique name within a detector set.
    fn name(&self) -> &'static str;

    /// Whether this detector runs under `policy`. Disarmed detectors are left
    /// out of the set entirely.
    fn is_armed(&self, _policy: &ExamPolicy) -> bool {
        true
    }

    /// React to one signal, appending to `out`.
    fn observe(&mut self, signal: &BrowserSignal, now: Timestamp, out: &mut Observation);
}

/// The built-in detectors for a session started at `started_at`.
pub fn standard_detectors(policy: &ExamPolicy, started_at: Timestamp) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(FocusDetector::new(policy.max_violation_count)),
        Box::new(VisibilityDetector),
        Box::new(ClipboardDetector),
        Box::new(ContextMenuDetector),
        Box::new(DevtoolsDetector::default()),
        Box::new(FullscreenDetector::default()),
        Box::new(InactivityDetector::new(started_at)),
        Box::new(ScreenshotDetector),
    ]
}

#[cfg(test)]
pub(crate) fn observe_once(
    detector: &mut dyn Detector,
    signal: BrowserSignal,
    now: Timestamp,
) -> Observation {
    let mut out = Observation::default();
    detector.observe(&signal, now, &mut out);
    out
}

#[cfg(test)]
pub(crate) fn test_policy() -> ExamPolicy {
    use shared_types::ExamId;
    ExamPolicy {
        exam_id: ExamId::new("exam-1"),
        max_violation_count: 3,
        counted_kinds: ExamPolicy::default_counted_kinds(false, true),
        require_full_screen: true,
        allow_copy_paste: false,
        start_time: 0,
        end_time: 3_600_000,
    }
}
