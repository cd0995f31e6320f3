//! Window focus: every blur is a switch; the matching focus reports time away.

use shared_types::{Severity, Timestamp, ViolationKind};

use super::Detector;
use crate::domain::{BrowserSignal, Detection, Observation, UiDirective};

#[derive(Debug)]
pub struct FocusDetector {
    max_violations: i32,
    switch_count: u32,
    blurred_at: Option<Timestamp>,
}

impl FocusDetector {
    pub fn new(max_violations: i32) -> Self {
        Self {
            max_violations,
            switch_count: 0,
            blurred_at: None,
        }
    }

    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }
}

impl Detector for FocusDetector {
    fn name(&self) -> &'static str {
        "focus"
    }

    fn observe(&mut self, signal: &BrowserSignal, now: Timestamp, out: &mut Observation) {
        match signal {
            BrowserSignal::WindowBlur => {
                self.switch_count += 1;
                self.blurred_at = Some(now);
                out.detect(
                    Detection::new(
                        ViolationKind::WindowBlur,
                        Severity::High,
                        format!("Window lost focus (Switch #{})", self.switch_count),
                    )
                    .with_metadata("switchIndex", self.switch_count),
                );
                out.show(UiDirective::critical(format!(
                    "TAB SWITCH DETECTED! ({}/{}) Do not switch tabs or you will be disqualified!",
                    self.switch_count,
                    self.max_violations.max(0)
                )));
            }
            BrowserSignal::WindowFocus => {
                let Some(blurred_at) = self.blurred_at.take() else {
                    return;
                };
                let away = now.saturating_sub(blurred_at) as f64 / 1000.0;
                out.detect(
                    Detection::new(
                        ViolationKind::TabSwitch,
                        Severity::High,
                        format!("Returned to exam after {away:.1}s"),
                    )
                    .with_metadata("timeAwaySeconds", away),
                );
            }
            _ => {}
        }
    }
}
