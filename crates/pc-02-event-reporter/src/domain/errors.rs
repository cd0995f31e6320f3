//! Reporter error types.
//!
//! None of these ever reach the student: a failed report is logged and
//! dropped.

use thiserror::Error;

/// Delivery failure of a single report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, reset, DNS, timeout.
    #[error("Network failure: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("Server rejected report ({status}): {code}")]
    Rejected { status: u16, code: String },

    #[error("Unreadable server response: {0}")]
    Parse(String),

    #[error("Invalid transport configuration: {0}")]
    Config(String),
}

impl TransportError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "TRANSIENT_NETWORK",
            Self::Rejected { .. } => "REJECTED",
            Self::Parse(_) => "BAD_RESPONSE",
            Self::Config(_) => "TRANSPORT_CONFIG",
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session is already locked; nothing more is sent.
    #[error("Session locked")]
    Locked,
}
