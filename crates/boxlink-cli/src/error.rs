//! CLI-specific error types and exit codes.

use boxlink_core::SettingsError;
use boxlink_http::TransportError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid connection settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP layer could not be set up.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Terminal input or output failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Transport(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,        // EX_IOERR
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<TransportError> for CliError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Endpoint(settings_err) => settings_err.into(),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
        assert_eq!(CliError::Transport(String::new()).exit_code(), 69);
        assert_eq!(CliError::Io(String::new()).exit_code(), 74);
    }

    #[test]
    fn test_settings_error_is_config() {
        let err = CliError::from(SettingsError::ZeroLivenessTimeout);
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_endpoint_error_is_config() {
        let err = CliError::from(TransportError::Endpoint(SettingsError::EmptyEventName));
        assert_eq!(err.exit_code(), 78);
    }
}
