//! # Submission Lifecycle Subsystem
//!
//! **Component:** Submission State Machine
//!
//! ## Purpose
//!
//! Owns the exam attempt record of every (student, exam) pair and the
//! transitions a student or the clock can drive on it.
//!
//! ## State Machine
//!
//! ```text
//! [IN_PROGRESS] ──submit──→ [SUBMITTED]
//!       │
//!       ├──── ledger DISQUALIFY ──→ [DISQUALIFIED]
//!       │
//!       └──── endTime + grace ──→ [TIMEOUT]
//! ```
//!
//! | Transition | Driven by | Stamps |
//! |------------|-----------|--------|
//! | create | `start_exam` | `startedAt = now` |
//! | SUBMITTED | `submit_exam` | `submittedAt = now`, `timeSpentSeconds` |
//! | TIMEOUT | `sweep_timeouts` | `submittedAt = now`, `timeSpentSeconds` |
//! | DISQUALIFIED | violation ledger | `submittedAt = event time`, reason |
//!
//! All right-hand states are terminal.
//!
//! ## Concurrency
//!
//! Each record lives in its own [`SubmissionCell`]. Lifecycle and ledger
//! fields sit behind one mutex (the per-record critical section); code text
//! sits behind a second one so snapshots and saves of large drafts do not
//! clone under the record lock. Lock order is always record, then code.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - in-memory store, exam catalog, student roster      │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - SubmissionLifecycleApi                     │
//! │  ports/outbound.rs - SubmissionStore, ExamCatalog,              │
//! │                      StudentDirectory, AuditSink, TimeSource    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/submission.rs - SubmissionRecord, SubmissionCell        │
//! │  domain/exam.rs       - ExamDefinition, ExamSummary             │
//! │  domain/roll_number.rs - roll number normalisation              │
//! │  domain/errors.rs     - LifecycleError, StoreError              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::{LifecycleDependencies, LifecycleService};
