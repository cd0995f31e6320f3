//! Outbound (Driven) ports for the Event Reporter.
//!
//! | Port | Collaborator |
//! |------|--------------|
//! | `ReportTransport` | proctoring server (`POST /activity`) |
//! | `ExamUi` | host page: toasts, overlays, input controls |

use async_trait::async_trait;
use pc_01_detectors::UiDirective;
use shared_types::{ActivityAck, ActivityReport};

use crate::domain::TransportError;

#[async_trait]
pub trait ReportTransport: Send + Sync {
    async fn send(&self, report: &ActivityReport) -> Result<ActivityAck, TransportError>;
}

pub trait ExamUi: Send + Sync {
    fn show(&self, directive: &UiDirective);

    /// Disable every input control and show the terminal overlay.
    fn lock_down(&self, title: &str, message: &str);
}
