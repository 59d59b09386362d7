//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the HTTP adapters are wired into the
//! core connection manager. Handlers receive the composed [`CliContext`].

use std::sync::Arc;
use std::time::Duration;

use boxlink_core::{ClientSettings, ConnectionManager, DEFAULT_BASE_URL, resolve_base_url};
use boxlink_http::{HttpCommandSink, HttpConfig, SseEventSource};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Base URL used unless served from the box.
    pub base_url: Option<String>,
    /// The "served from box" flag (`yes` to use `origin`).
    pub served_from_box: Option<String>,
    /// Page origin when served from the box.
    pub origin: Option<String>,
    pub event_name: Option<String>,
    pub events_path: Option<String>,
    pub liveness_timeout: Option<Duration>,
    /// HTTP adapter settings.
    pub http: HttpConfig,
}

impl CliConfig {
    /// Collect the connection options from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            served_from_box: cli.served_from_box.clone(),
            origin: cli.origin.clone(),
            event_name: cli.event_name.clone(),
            events_path: cli.events_path.clone(),
            liveness_timeout: cli.liveness_timeout_ms.map(Duration::from_millis),
            http: HttpConfig::new(),
        }
    }

    /// Resolve and validate the client settings.
    pub fn client_settings(&self) -> Result<ClientSettings, CliError> {
        let fallback = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = resolve_base_url(
            self.served_from_box.as_deref(),
            self.origin.as_deref(),
            fallback,
        )?;

        let mut settings = ClientSettings::new(base_url.as_str())?;
        if let Some(path) = &self.events_path {
            settings = settings.with_events_path(path.as_str());
        }
        if let Some(name) = &self.event_name {
            settings = settings.with_event_name(name.as_str());
        }
        if let Some(timeout) = self.liveness_timeout {
            settings = settings.with_liveness_timeout(timeout);
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Fully composed client for CLI commands.
pub struct CliContext {
    /// The live status client.
    pub manager: ConnectionManager,
    /// Settings the client was built from.
    pub settings: ClientSettings,
}

impl CliContext {
    pub const fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

/// Bootstrap the CLI application.
///
/// Opens the status stream right away, so it must run inside the Tokio
/// runtime.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let settings = config.client_settings()?;
    debug!(base_url = %settings.base_url(), "Bootstrapping boxlink client");

    let source = SseEventSource::new(&settings, &config.http)?;
    let commands = HttpCommandSink::new(&settings, &config.http)?;
    let manager = ConnectionManager::connect(&settings, &source, Arc::new(commands));

    Ok(CliContext { manager, settings })
}
