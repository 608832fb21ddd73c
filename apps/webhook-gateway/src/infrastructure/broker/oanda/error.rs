//! OANDA-specific error types.

use thiserror::Error;

use crate::application::ports::{BrokerError, TransportKind};

/// Errors from the OANDA adapter.
#[derive(Debug, Error, Clone)]
pub enum OandaError {
    /// No HTTP response was received.
    #[error("network error ({}): {message}", kind.as_str())]
    Network {
        /// Failure kind.
        kind: TransportKind,
        /// Error details.
        message: String,
    },

    /// A lookup returned a non-2xx status.
    #[error("API returned status {status}")]
    Status {
        /// HTTP status.
        status: u16,
        /// Response body.
        body: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Response parsed but lacked a required value.
    #[error("response missing {0}")]
    MissingValue(&'static str),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for OandaError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Other
        };
        Self::Network {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<OandaError> for BrokerError {
    fn from(err: OandaError) -> Self {
        match err {
            OandaError::Network { kind, message } => Self::Transport { kind, message },
            OandaError::Status { status, body } => Self::Rejected { status, body },
            OandaError::JsonParse(msg) => Self::InvalidResponse(msg),
            OandaError::MissingValue(what) => Self::InvalidResponse(format!("missing {what}")),
            OandaError::Client(msg) => Self::Transport {
                kind: TransportKind::Other,
                message: msg,
            },
        }
    }
}
