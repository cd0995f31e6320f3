//! # Domain Layer - Violation Ledger
//!
//! - `evaluator`: the pure `decide` function
//! - `result`: what an append reports back
//! - `errors`: LedgerError

pub mod errors;
pub mod evaluator;
pub mod result;

pub use errors::*;
pub use evaluator::*;
pub use result::*;
