//! # Domain Layer - Detector Set
//!
//! - `signals`: raw browser observations handed in by the host
//! - `observation`: what a detector produces for one signal
//! - `phase`: the ACTIVE / LOCKED session phase
//! - `session`: who and what is being proctored
//! - `errors`: DetectorError

pub mod errors;
pub mod observation;
pub mod phase;
pub mod session;
pub mod signals;

pub use errors::*;
pub use observation::*;
pub use phase::*;
pub use session::*;
pub use signals::*;
