//! # Detector Set
//!
//! Fans one [`BrowserSignal`] out to every armed detector, stamps session
//! identity onto each detection and publishes it to the reporter's channel.
//!
//! ```text
//! host page ──signal──→ DetectorSet ──ViolationEvent──→ bus ──→ reporter
//!                           │
//!                           └──→ SignalResponse (disposition, toasts, prompts)
//! ```
//!
//! Once the session phase is LOCKED the set goes quiet: no events, no UI.

use std::collections::HashSet;

use serde::Serialize;
use shared_bus::{EventPublisher, PublishOutcome};
use shared_types::{Timestamp, ViolationEvent};
use tracing::{debug, warn};

use crate::detectors::{standard_detectors, Detector};
use crate::domain::{
    BrowserSignal, DetectorError, Disposition, Observation, PhaseWatch, SessionContext,
    UiDirective,
};

/// What the host must do in response to a signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalResponse {
    pub disposition: Disposition,
    pub directives: Vec<UiDirective>,
    /// Events handed to the reporter.
    pub reported: usize,
}

pub struct DetectorSet<P: EventPublisher> {
    session: SessionContext,
    detectors: Vec<Box<dyn Detector>>,
    publisher: P,
    phase: PhaseWatch,
    suppressed: u64,
}

pub struct DetectorSetBuilder<P: EventPublisher> {
    session: SessionContext,
    publisher: P,
    phase: PhaseWatch,
    detectors: Vec<Box<dyn Detector>>,
}

impl<P: EventPublisher> DetectorSetBuilder<P> {
    /// Adds the eight built-in detectors.
    pub fn with_standard_detectors(mut self, started_at: Timestamp) -> Self {
        self.detectors
            .extend(standard_detectors(&self.session.policy, started_at));
        self
    }

    pub fn with_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Drops detectors the exam policy disarms.
    ///
    /// # Errors
    ///
    /// - `MissingStudent`: blank student id
    /// - `DuplicateDetector`: two detectors share a name
    pub fn build(self) -> Result<DetectorSet<P>, DetectorError> {
        if self.session.student_id.as_str().trim().is_empty() {
            return Err(DetectorError::MissingStudent);
        }

        let mut names = HashSet::new();
        for detector in &self.detectors {
            if !names.insert(detector.name()) {
                return Err(DetectorError::DuplicateDetector(detector.name()));
            }
        }

        let policy = &self.session.policy;
        let detectors: Vec<_> = self
            .detectors
            .into_iter()
            .filter(|detector| {
                let armed = detector.is_armed(policy);
                if !armed {
                    debug!(detector = detector.name(), exam_id = %policy.exam_id, "Detector disarmed by policy");
                }
                armed
            })
            .collect();

        Ok(DetectorSet {
            session: self.session,
            detectors,
            publisher: self.publisher,
            phase: self.phase,
            suppressed: 0,
        })
    }
}

impl<P: EventPublisher> DetectorSet<P> {
    pub fn builder(session: SessionContext, publisher: P, phase: PhaseWatch) -> DetectorSetBuilder<P> {
        DetectorSetBuilder {
            session,
            publisher,
            phase,
            detectors: Vec::new(),
        }
    }

    /// Standard set for `session`, started at `started_at`.
    pub fn standard(
        session: SessionContext,
        publisher: P,
        phase: PhaseWatch,
        started_at: Timestamp,
    ) -> Result<Self, DetectorError> {
        Self::builder(session, publisher, phase)
            .with_standard_detectors(started_at)
            .build()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Names of the armed detectors, in registration order.
    pub fn armed(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Signals ignored because the session was locked.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn handle(&mut self, signal: &BrowserSignal, now: Timestamp) -> SignalResponse {
        if self.phase.is_locked() {
            self.suppressed += 1;
            return SignalResponse::default();
        }

        let mut observation = Observation::default();
        for detector in &mut self.detectors {
            detector.observe(signal, now, &mut observation);
        }

        let Observation {
            detections,
            directives,
            disposition,
        } = observation;

        let mut reported = 0;
        for detection in detections {
            let mut event = ViolationEvent::new(
                self.session.student_id.clone(),
                Some(self.session.exam_id().clone()),
                detection.kind,
                detection.severity,
                detection.description,
                now,
            );
            event.metadata = detection.metadata;

            debug!(
                student_id = %event.student_id,
                kind = event.kind.as_str(),
                signal = signal.label(),
                "Detector fired"
            );

            match self.publisher.publish(event) {
                PublishOutcome::Queued => reported += 1,
                outcome => {
                    warn!(?outcome, signal = signal.label(), "Violation event not queued");
                }
            }
        }

        SignalResponse {
            disposition,
            directives,
            reported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_policy;
    use crate::domain::{session_phase, KeyChord};
    use shared_bus::bounded;
    use shared_types::{StudentId, ViolationKind};

    fn session() -> SessionContext {
        SessionContext::new(StudentId::new("23JR1A05A4"), test_policy())
    }

    #[tokio::test]
    async fn test_signal_reaches_reporter_channel() {
        let (publisher, mut receiver) = bounded(8);
        let (_controller, phase) = session_phase();
        let mut set = DetectorSet::standard(session(), publisher, phase, 0).unwrap();

        let response = set.handle(&BrowserSignal::WindowBlur, 1_000);
        assert_eq!(response.reported, 1);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.kind, ViolationKind::WindowBlur);
        assert_eq!(event.occurred_at, 1_000);
        assert_eq!(event.exam_id.as_ref().map(|e| e.as_str()), Some("exam-1"));
        assert_eq!(event.metadata["switchIndex"], 1);
    }

    #[tokio::test]
    async fn test_policy_disarms_detectors() {
        let mut policy = test_policy();
        policy.allow_copy_paste = true;
        policy.require_full_screen = false;
        let (publisher, mut receiver) = bounded(8);
        let (_controller, phase) = session_phase();
        let mut set = DetectorSet::standard(
            SessionContext::new(StudentId::new("23JR1A05A4"), policy),
            publisher,
            phase,
            0,
        )
        .unwrap();

        assert!(!set.armed().contains(&"clipboard"));
        assert!(!set.armed().contains(&"fullscreen"));
        assert_eq!(set.handle(&BrowserSignal::Paste, 0), SignalResponse::default());
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_locked_session_is_silent() {
        let (publisher, mut receiver) = bounded(8);
        let (controller, phase) = session_phase();
        let mut set = DetectorSet::standard(session(), publisher, phase, 0).unwrap();

        controller.lock();
        let response = set.handle(&BrowserSignal::KeyDown(KeyChord::new("F12")), 5);
        assert_eq!(response, SignalResponse::default());
        assert_eq!(set.suppressed(), 1);
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_blur_and_hidden_both_reported() {
        let (publisher, mut receiver) = bounded(8);
        let (_controller, phase) = session_phase();
        let mut set = DetectorSet::standard(session(), publisher, phase, 0).unwrap();

        set.handle(&BrowserSignal::WindowBlur, 10);
        set.handle(&BrowserSignal::VisibilityChanged { hidden: true }, 11);

        let kinds = [
            receiver.recv().await.unwrap().kind,
            receiver.recv().await.unwrap().kind,
        ];
        assert_eq!(kinds, [ViolationKind::WindowBlur, ViolationKind::TabSwitch]);
    }

    #[test]
    fn test_full_channel_drops_but_still_intercepts() {
        let (publisher, _receiver) = bounded(1);
        let (_controller, phase) = session_phase();
        let mut set = DetectorSet::standard(session(), publisher, phase, 0).unwrap();

        set.handle(&BrowserSignal::ContextMenu, 0);
        let response = set.handle(&BrowserSignal::ContextMenu, 1);
        assert_eq!(response.reported, 0);
        assert_eq!(response.disposition, Disposition::PreventDefault);
    }

    #[test]
    fn test_builder_rejects_duplicates_and_blank_student() {
        let (publisher, _receiver) = bounded(1);
        let (_controller, phase) = session_phase();
        let result = DetectorSet::builder(session(), publisher.clone(), phase.clone())
            .with_standard_detectors(0)
            .with_detector(Box::new(crate::detectors::VisibilityDetector))
            .build();
        assert!(matches!(result, Err(DetectorError::DuplicateDetector("visibility"))));

        let blank = SessionContext::new(StudentId::new("  "), test_policy());
        assert!(matches!(
            DetectorSet::standard(blank, publisher, phase, 0),
            Err(DetectorError::MissingStudent)
        ));
    }
}
