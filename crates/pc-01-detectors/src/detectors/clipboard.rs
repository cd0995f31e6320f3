//! Clipboard events. Inert when the exam allows copy/paste.

use shared_types::{ExamPolicy, Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, Observation, UiDirective};

#[derive(Debug, Default)]
pub struct ClipboardDetector;

impl Detector for ClipboardDetector {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn is_armed(&self, policy: &ExamPolicy) -> bool {
        !policy.allow_copy_paste
    }

    fn observe(&mut self, signal: &BrowserSignal, _now: Timestamp, out: &mut Observation) {
        let (kind, severity, description, toast) = match signal {
            BrowserSignal::Copy => (
                ViolationKind::CopyAttempt,
                Severity::Medium,
                "Attempted to copy text",
                "Copying is disabled during the exam!",
            ),
            BrowserSignal::Cut => (
                ViolationKind::CopyAttempt,
                Severity::Medium,
                "Attempted to cut text",
                "Cutting is disabled during the exam!",
            ),
            BrowserSignal::Paste => (
                ViolationKind::PasteAttempt,
                Severity::High,
                "Attempted to paste text",
                "Pasting is disabled during the exam!",
            ),
            _ => return,
        };
        out.prevent_default();
        out.detect(Detection::new(kind, severity, description));
        out.show(UiDirective::warning(toast));
    }
}
