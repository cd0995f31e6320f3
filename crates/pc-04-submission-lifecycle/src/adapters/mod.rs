//! In-memory adapters for the outbound ports.

pub mod catalog;
pub mod directory;
pub mod memory_store;

pub use catalog::*;
pub use directory::*;
pub use memory_store::*;
