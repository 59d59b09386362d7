//! Client settings and base URL resolution.
//!
//! Nothing here is hard-coded into the connection manager: the base URL,
//! stream path, event name and liveness window are all injected, so the same
//! client works when served from the box itself and from a development host.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Development fallback used when the client is not served from the box.
pub const DEFAULT_BASE_URL: &str = "http://adabox.local/";

/// Stream endpoint path relative to the base URL.
pub const DEFAULT_EVENTS_PATH: &str = "events";

/// Event type that carries status snapshots.
pub const DEFAULT_EVENT_NAME: &str = "status";

/// Liveness window: the data counts as stale after this long without a snapshot.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_millis(5000);

/// Value of the "served from box" flag that selects the page origin.
const SERVED_FROM_BOX: &str = "yes";

/// Settings validation error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Base URL '{0}' cannot carry relative endpoint paths")]
    OpaqueBaseUrl(String),

    #[error("Event name cannot be empty")]
    EmptyEventName,

    #[error("Liveness timeout must be greater than zero")]
    ZeroLivenessTimeout,
}

/// Configuration of the live status client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    base_url: Url,
    events_path: String,
    event_name: String,
    liveness_timeout: Duration,
}

impl ClientSettings {
    /// Settings for a box at `base_url` with every other value defaulted.
    pub fn new(base_url: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            events_path: DEFAULT_EVENTS_PATH.to_string(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
        })
    }

    /// Set the stream endpoint path, relative to the base URL.
    #[must_use]
    pub fn with_events_path(mut self, path: impl Into<String>) -> Self {
        self.events_path = path.into();
        self
    }

    /// Set the event type that carries snapshots.
    #[must_use]
    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = name.into();
        self
    }

    /// Set the liveness window.
    #[must_use]
    pub const fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub const fn liveness_timeout(&self) -> Duration {
        self.liveness_timeout
    }

    /// Full URL of the event stream.
    pub fn events_url(&self) -> Result<Url, SettingsError> {
        self.endpoint(&self.events_path)
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// Leading slashes are ignored so `"/api/x"` and `"api/x"` both stay
    /// below the base URL's path.
    pub fn endpoint(&self, path: &str) -> Result<Url, SettingsError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SettingsError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Check invariants that builders cannot enforce.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.event_name.trim().is_empty() {
            return Err(SettingsError::EmptyEventName);
        }
        if self.liveness_timeout.is_zero() {
            return Err(SettingsError::ZeroLivenessTimeout);
        }
        Ok(())
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("default base URL is valid")
    }
}

/// Pick the base URL the way a page served by the box would.
///
/// When the page says it was served from the box (`served_from_box == "yes"`)
/// and its origin is known, endpoints live on that origin. Otherwise the
/// development `fallback` is used.
pub fn resolve_base_url(
    served_from_box: Option<&str>,
    page_origin: Option<&str>,
    fallback: &str,
) -> Result<Url, SettingsError> {
    let from_box = served_from_box.is_some_and(|flag| flag.trim() == SERVED_FROM_BOX);
    match (from_box, page_origin) {
        (true, Some(origin)) => parse_base_url(origin),
        _ => parse_base_url(fallback),
    }
}

/// Parse a base URL and make sure relative joins stay below its path.
fn parse_base_url(raw: &str) -> Result<Url, SettingsError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| SettingsError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SettingsError::OpaqueBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
