//! # Violation Ledger Subsystem
//!
//! **Components:** Violation Ledger, Disqualification Evaluator, Activity Log
//!
//! ## Purpose
//!
//! The authoritative per-(student, exam) record of every reported event and
//! the running violation count, plus the pure rule that turns that count
//! into a verdict.
//!
//! ## Append Flow
//!
//! ```text
//! append(event)
//!   │
//!   ├─ eventId already seen? ──────────────→ Duplicate (no effect)
//!   ├─ activity log ← event (always)
//!   ├─ no exam / no submission? ───────────→ AuditOnly
//!   └─ lock(submission)
//!        ├─ terminal? ─────────────────────→ Terminal (count unchanged)
//!        ├─ violation_log ← event, count += counted
//!        ├─ decide(count, policy)
//!        │     ├─ CONTINUE
//!        │     ├─ WARN
//!        │     └─ DISQUALIFY → status = DISQUALIFIED,
//!        │                     activity log ← "Disqualified: <reason>"
//!      unlock
//! ```
//!
//! The read-increment-decide-transition sequence runs entirely inside the
//! submission's critical section, so two concurrent reports at
//! `count == max - 1` produce exactly one disqualification.
//!
//! ## Evaluator
//!
//! | Condition | Decision |
//! |-----------|----------|
//! | `max <= 0` and `count > 0` | DISQUALIFY |
//! | `count >= max` | DISQUALIFY |
//! | `count == max - 1` | WARN |
//! | otherwise | CONTINUE |

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
pub use service::{LedgerDependencies, ViolationLedger};
