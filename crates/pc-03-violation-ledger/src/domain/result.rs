//! What an append reports back to the caller.

use serde::{Deserialize, Serialize};
use shared_types::{ActivityAck, SubmissionStatus, Verdict};

use super::evaluator::Decision;

/// How the ledger treated an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppendOutcome {
    /// Logged on the submission and incremented its counter.
    Counted,
    /// Logged on the submission; kind not counted by the exam.
    Uncounted,
    /// Submission already terminal; activity log only.
    Terminal,
    /// No exam or no submission (e.g. LOGIN); activity log only.
    AuditOnly,
    /// Exact re-delivery of an already recorded event id.
    Duplicate,
}

impl AppendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counted => "COUNTED",
            Self::Uncounted => "UNCOUNTED",
            Self::Terminal => "TERMINAL",
            Self::AuditOnly => "AUDIT_ONLY",
            Self::Duplicate => "DUPLICATE",
        }
    }
}

/// Result of `ViolationLedgerApi::append`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResult {
    pub outcome: AppendOutcome,
    /// `None` when the event matched no submission.
    pub violation_count: Option<u32>,
    /// Evaluator decision; `Continue` whenever the evaluator did not run.
    pub decision: Decision,
    pub status: Option<SubmissionStatus>,
}

impl LedgerResult {
    pub fn audit_only() -> Self {
        Self {
            outcome: AppendOutcome::AuditOnly,
            violation_count: None,
            decision: Decision::Continue,
            status: None,
        }
    }

    /// Result for an event that did not reach the evaluator.
    pub fn unevaluated(outcome: AppendOutcome, violation_count: u32, status: SubmissionStatus) -> Self {
        Self {
            outcome,
            violation_count: Some(violation_count),
            decision: Decision::Continue,
            status: Some(status),
        }
    }

    /// A disqualified submission keeps reporting as disqualified, so a
    /// client that missed the first verdict still locks down.
    pub fn verdict(&self) -> Verdict {
        if self.status == Some(SubmissionStatus::Disqualified) {
            return Verdict::disqualified();
        }
        self.decision.verdict()
    }

    pub fn ack(&self) -> ActivityAck {
        let verdict = self.verdict();
        ActivityAck {
            accepted: true,
            disqualified: verdict.disqualified,
            warning_message: verdict.warning_message,
            violation_count: self.violation_count,
        }
    }
}
