//! Command sink port for the box's management endpoints.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::BoxCommand;

/// Failure to deliver a command.
///
/// The connection manager only logs these: a box that is powering off may
/// well drop the connection before answering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The box answered with a non-success status.
    #[error("{command} rejected with status {status}")]
    Rejected { command: BoxCommand, status: u16 },

    /// The request never got an answer.
    #[error("{command} could not be delivered: {message}")]
    Transport {
        command: BoxCommand,
        message: String,
    },
}

/// Delivers one-shot commands to the box.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Send a single command. No retries.
    async fn send(&self, command: BoxCommand) -> Result<(), CommandError>;
}

/// A command sink that accepts and discards every command.
///
/// Used by read-only consumers that never issue commands.
#[derive(Debug, Clone, Default)]
pub struct NoopCommandSink;

impl NoopCommandSink {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandSink for NoopCommandSink {
    async fn send(&self, _command: BoxCommand) -> Result<(), CommandError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink_accepts_everything() {
        let sink = NoopCommandSink::new();
        assert_eq!(sink.send(BoxCommand::PowerDown).await, Ok(()));
        assert_eq!(sink.send(BoxCommand::StopWifi).await, Ok(()));
    }

    #[test]
    fn test_error_messages() {
        let rejected = CommandError::Rejected {
            command: BoxCommand::PowerDown,
            status: 503,
        };
        assert_eq!(rejected.to_string(), "powerdown rejected with status 503");

        let transport = CommandError::Transport {
            command: BoxCommand::StopWifi,
            message: "connection reset".to_string(),
        };
        assert!(transport.to_string().contains("stop-wifi"));
        assert!(transport.to_string().contains("connection reset"));
    }
}
