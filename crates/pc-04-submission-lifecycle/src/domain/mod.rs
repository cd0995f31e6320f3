//! # Domain Layer - Submission Lifecycle
//!
//! - `submission`: the attempt record, its transitions and the per-record cell
//! - `exam`: catalog entries and the policy derived from them
//! - `roll_number`: student identifier normalisation
//! - `config`: sweep interval and grace period
//! - `errors`: LifecycleError, StoreError

pub mod config;
pub mod errors;
pub mod exam;
pub mod roll_number;
pub mod submission;

pub use config::*;
pub use errors::*;
pub use exam::*;
pub use roll_number::*;
pub use submission::*;
