//! Disqualification Evaluator.

use serde::{Deserialize, Serialize};
use shared_types::{ExamPolicy, Verdict};

/// Outcome of evaluating a violation count against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Continue,
    /// Exactly one violation remains before disqualification.
    Warn,
    Disqualify,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "CONTINUE",
            Self::Warn => "WARN",
            Self::Disqualify => "DISQUALIFY",
        }
    }

    /// Client-facing form of the decision.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Continue => Verdict::proceed(),
            Self::Warn => Verdict::warn(),
            Self::Disqualify => Verdict::disqualified(),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide the consequence of `violation_count` counted violations.
pub fn decide(violation_count: u32, policy: &ExamPolicy) -> Decision {
    decide_with_max(violation_count, policy.max_violation_count)
}

/// [`decide`] on a bare threshold.
///
/// A threshold of zero or below disqualifies on the first counted violation.
pub fn decide_with_max(violation_count: u32, max_violation_count: i32) -> Decision {
    let Ok(max) = u32::try_from(max_violation_count) else {
        return immediate(violation_count);
    };
    if max == 0 {
        return immediate(violation_count);
    }

    if violation_count >= max {
        Decision::Disqualify
    } else if violation_count == max - 1 {
        Decision::Warn
    } else {
        Decision::Continue
    }
}

fn immediate(violation_count: u32) -> Decision {
    if violation_count > 0 {
        Decision::Disqualify
    } else {
        Decision::Continue
    }
}

/// Human-readable reason stored on a disqualified submission.
pub fn disqualification_reason(policy: &ExamPolicy) -> String {
    format!(
        "Exceeded maximum violations ({})",
        policy.max_violation_count.max(0)
    )
}
