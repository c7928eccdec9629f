//! Error types shared by the dashboard library and client.
//!
//! The `DashboardError` enum covers transport failures on both endpoints as well
//! as the recoverable parse failures (change values, contract names, timestamps)
//! that the total public operations absorb and log.
use std::io;

use thiserror::Error;

/// Unified error type for the price dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Network-level failure (connect, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Numeric HTTP status.
        status: u16,
    },

    /// Failure while decoding a JSON payload.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// I/O error from the standard library (terminal output, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Base URL could not be parsed or cannot carry path segments.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Change value that does not parse as a number.
    #[error("Malformed change value: {0:?}")]
    MalformedChange(String),

    /// Commodity name that does not follow the futures contract pattern.
    #[error("Unrecognized contract pattern: {0:?}")]
    UnrecognizedContractPattern(String),

    /// Timestamp that is not ISO-8601.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

impl DashboardError {
    /// Whether this failure came from the network boundary.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DashboardError::Transport(_)
                | DashboardError::HttpStatus { .. }
                | DashboardError::SerdeJson(_)
        )
    }
}
