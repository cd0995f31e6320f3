//! # Exam Proctor Test Suite
//!
//! Cross-crate scenarios that need the browser side and the server side
//! at once.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── support.rs            # server + client harness
//!     ├── client_server_flow.rs # detectors → bus → reporter → gateway → ledger
//!     ├── server_rules.rs       # counting, races, terminal states
//!     └── http_client.rs        # real HTTP transport against a bound server
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::server_rules::
//! cargo bench -p pc-tests
//! ```

#![allow(dead_code)]

pub mod integration;
