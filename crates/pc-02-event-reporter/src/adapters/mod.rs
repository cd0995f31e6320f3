//! Adapters for the Event Reporter.

pub mod http;

pub use http::HttpTransport;
