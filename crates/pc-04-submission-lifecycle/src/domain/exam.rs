//! Exam catalog entries.

use serde::{Deserialize, Serialize};
use shared_types::{ExamId, ExamPolicy, Timestamp, ViolationKind};
use std::collections::BTreeSet;

/// Default number of counted violations before disqualification.
pub const DEFAULT_MAX_VIOLATIONS: i32 = 3;

/// A catalog entry: the exam itself plus its proctoring flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDefinition {
    pub id: ExamId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Left out of [`ExamSummary`]; served with [`ExamDetail`] once started.
    #[serde(default)]
    pub question: String,
    pub duration_minutes: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub max_violation_count: i32,
    pub require_full_screen: bool,
    pub allow_copy_paste: bool,
    /// Overrides the kinds derived from the flags when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counted_kinds: Option<BTreeSet<ViolationKind>>,
    pub is_active: bool,
}

impl ExamDefinition {
    /// Minimal definition with the platform defaults.
    pub fn new(id: ExamId, title: impl Into<String>, start_time: Timestamp, end_time: Timestamp) -> Self {
        let duration_minutes =
            u32::try_from(end_time.saturating_sub(start_time) / 60_000).unwrap_or(u32::MAX);
        Self {
            id,
            title: title.into(),
            description: String::new(),
            question: String::new(),
            duration_minutes,
            start_time,
            end_time,
            max_violation_count: DEFAULT_MAX_VIOLATIONS,
            require_full_screen: true,
            allow_copy_paste: false,
            counted_kinds: None,
            is_active: true,
        }
    }

    /// The proctoring policy this entry implies.
    pub fn policy(&self) -> ExamPolicy {
        let counted_kinds = self.counted_kinds.clone().unwrap_or_else(|| {
            ExamPolicy::default_counted_kinds(self.allow_copy_paste, self.require_full_screen)
        });

        ExamPolicy {
            exam_id: self.id.clone(),
            max_violation_count: self.max_violation_count,
            counted_kinds,
            require_full_screen: self.require_full_screen,
            allow_copy_paste: self.allow_copy_paste,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Whether a new attempt may begin at `now`.
    pub fn accepts_start_at(&self, now: Timestamp) -> bool {
        self.is_active && now >= self.start_time && now <= self.end_time
    }

    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            duration_minutes: self.duration_minutes,
            start_time: self.start_time,
            end_time: self.end_time,
            max_violation_count: self.max_violation_count,
            require_full_screen: self.require_full_screen,
            allow_copy_paste: self.allow_copy_paste,
        }
    }

    pub fn detail(&self) -> ExamDetail {
        ExamDetail {
            summary: self.summary(),
            question: self.question.clone(),
        }
    }
}

/// Public view of an exam. Carries no question text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub id: ExamId,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub max_violation_count: i32,
    pub require_full_screen: bool,
    pub allow_copy_paste: bool,
}

/// What a student sees after starting: the summary plus the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetail {
    #[serde(flatten)]
    pub summary: ExamSummary,
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_platform() {
        let exam = ExamDefinition::new(ExamId::new("exam-1"), "Intro", 0, 3_600_000);
        assert_eq!(exam.max_violation_count, 3);
        assert!(exam.require_full_screen);
        assert!(!exam.allow_copy_paste);
        assert_eq!(exam.duration_minutes, 60);
    }

    #[test]
    fn test_policy_derives_counted_kinds_from_flags() {
        let mut exam = ExamDefinition::new(ExamId::new("exam-1"), "Intro", 0, 1_000);
        exam.allow_copy_paste = true;
        let policy = exam.policy();
        assert!(!policy.counts(ViolationKind::PasteAttempt));
        assert!(policy.counts(ViolationKind::TabSwitch));
    }

    #[test]
    fn test_explicit_counted_kinds_win() {
        let mut exam = ExamDefinition::new(ExamId::new("exam-1"), "Intro", 0, 1_000);
        exam.counted_kinds = Some([ViolationKind::TabSwitch, ViolationKind::WindowBlur].into());
        let policy = exam.policy();
        assert_eq!(policy.counted_kinds.len(), 2);
        assert!(!policy.counts(ViolationKind::DevtoolsOpened));
    }

    #[test]
    fn test_inactive_exam_refuses_start() {
        let mut exam = ExamDefinition::new(ExamId::new("exam-1"), "Intro", 100, 200);
        assert!(exam.accepts_start_at(150));
        assert!(!exam.accepts_start_at(201));
        exam.is_active = false;
        assert!(!exam.accepts_start_at(150));
    }

    #[test]
    fn test_summary_hides_question() {
        let mut exam = ExamDefinition::new(ExamId::new("exam-1"), "Intro", 0, 1_000);
        exam.question = "Build a navbar".into();
        let json = serde_json::to_value(exam.summary()).unwrap();
        assert!(json.get("question").is_none());
        assert_eq!(json["title"], "Intro");
    }

    #[test]
    fn test_detail_carries_question_without_counted_kinds() {
        let mut exam = ExamDefinition::new(ExamId::new("exam-1"), "Intro", 0, 1_000);
        exam.question = "Build a navbar".into();
        exam.counted_kinds = Some([ViolationKind::TabSwitch].into());
        let json = serde_json::to_value(exam.detail()).unwrap();
        assert_eq!(json["question"], "Build a navbar");
        assert_eq!(json["id"], "exam-1");
        assert!(json.get("countedKinds").is_none());
    }
}
