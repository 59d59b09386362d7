//! `POST` command sink for the box's management endpoints.

use async_trait::async_trait;
use boxlink_core::{BoxCommand, ClientSettings, CommandError, CommandSink};
use tracing::debug;

use crate::config::HttpConfig;
use crate::error::TransportError;

/// [`CommandSink`] that posts an empty body to `<base>/<command path>`.
///
/// The response body is ignored; only the status code matters.
#[derive(Debug, Clone)]
pub struct HttpCommandSink {
    client: reqwest::Client,
    settings: ClientSettings,
}

impl HttpCommandSink {
    pub fn new(settings: &ClientSettings, config: &HttpConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: config.build_client()?,
            settings: settings.clone(),
        })
    }

    async fn post(&self, command: BoxCommand) -> Result<(), TransportError> {
        let url = self.settings.endpoint(command.path())?;
        debug!(%url, %command, "Posting command");

        let response = self.client.post(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CommandSink for HttpCommandSink {
    async fn send(&self, command: BoxCommand) -> Result<(), CommandError> {
        self.post(command)
            .await
            .map_err(|e| e.into_command_error(command))
    }
}
