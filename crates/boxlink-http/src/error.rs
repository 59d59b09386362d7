//! Internal transport errors.
//!
//! These stay inside `boxlink-http` except at construction time; at the port
//! boundary they are mapped to [`CommandError`] or swallowed by the
//! reconnecting event stream.

use boxlink_core::{BoxCommand, CommandError, SettingsError};
use thiserror::Error;

/// Errors raised by the HTTP adapters.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The reqwest client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, I/O or protocol failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The box answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// An endpoint could not be resolved against the base URL.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] SettingsError),
}

impl TransportError {
    /// Map to the command port's error for `command`.
    pub fn into_command_error(self, command: BoxCommand) -> CommandError {
        match self {
            Self::Status { status, .. } => CommandError::Rejected { command, status },
            other => CommandError::Transport {
                command,
                message: other.to_string(),
            },
        }
    }
}
