//! # Session Phase
//!
//! `ACTIVE → LOCKED`, never back. The reporter owns the [`PhaseController`];
//! detectors and UI hold [`PhaseWatch`] receivers.

use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    #[default]
    Active,
    Locked,
}

impl SessionPhase {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

/// Write side. Only transition offered is [`PhaseController::lock`].
#[derive(Debug)]
pub struct PhaseController {
    sender: watch::Sender<SessionPhase>,
}

/// Read side.
#[derive(Debug, Clone)]
pub struct PhaseWatch {
    receiver: watch::Receiver<SessionPhase>,
}

/// Creates a phase starting ACTIVE.
pub fn session_phase() -> (PhaseController, PhaseWatch) {
    let (sender, receiver) = watch::channel(SessionPhase::Active);
    (PhaseController { sender }, PhaseWatch { receiver })
}

impl PhaseController {
    /// Moves to LOCKED. Returns `true` only for the call that made the move.
    pub fn lock(&self) -> bool {
        self.sender.send_if_modified(|phase| {
            if phase.is_locked() {
                return false;
            }
            *phase = SessionPhase::Locked;
            true
        })
    }

    pub fn current(&self) -> SessionPhase {
        *self.sender.borrow()
    }

    pub fn watch(&self) -> PhaseWatch {
        PhaseWatch {
            receiver: self.sender.subscribe(),
        }
    }
}

impl PhaseWatch {
    pub fn current(&self) -> SessionPhase {
        *self.receiver.borrow()
    }

    pub fn is_locked(&self) -> bool {
        self.current().is_locked()
    }

    /// Resolves once the session is locked, or when the controller is gone.
    pub async fn locked(&mut self) {
        let _ = self.receiver.wait_for(|phase| phase.is_locked()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_one_way() {
        let (controller, watch) = session_phase();
        assert_eq!(watch.current(), SessionPhase::Active);

        assert!(controller.lock());
        assert!(!controller.lock());
        assert!(watch.is_locked());
        assert_eq!(controller.current(), SessionPhase::Locked);
    }

    #[tokio::test]
    async fn test_locked_wakes_waiters() {
        let (controller, watch) = session_phase();
        let mut waiter = watch.clone();
        let handle = tokio::spawn(async move { waiter.locked().await });

        controller.lock();
        handle.await.unwrap();
        assert!(controller.watch().is_locked());
    }
}
