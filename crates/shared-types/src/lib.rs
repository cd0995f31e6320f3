//! # Shared Types Crate
//!
//! Domain entities and wire contracts shared by the client-side detector set,
//! the event reporter and the server-side proctoring subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: violation kinds, severities, exam policy and
//!   verdicts are defined once, here.
//! - **Immutable Facts**: a `ViolationEvent` is never mutated after creation.
//! - **Validated Edges**: wire bodies carry raw strings and are validated into
//!   typed events at the boundary.

pub mod entities;
pub mod errors;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use wire::*;
