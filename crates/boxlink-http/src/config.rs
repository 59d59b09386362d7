//! Public configuration for the HTTP adapters.

use std::time::Duration;

use crate::error::TransportError;

/// Connect timeout applied to every request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wait between event stream reconnection attempts until the box sends `retry:`.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Longest silence on an open event stream before it is treated as dead.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(15);

/// TCP keepalive interval for every connection.
pub const DEFAULT_TCP_KEEPALIVE: Duration = Duration::from_secs(10);

/// Configuration shared by the event source and the command sink.
///
/// # Example
///
/// ```
/// use boxlink_http::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new()
///     .with_reconnect_delay(Duration::from_secs(1))
///     .with_user_agent("status-panel/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// TCP connect timeout; there is no overall request timeout
    pub(crate) connect_timeout: Duration,
    /// Reconnection delay used until the stream overrides it
    pub(crate) reconnect_delay: Duration,
    /// Silence after which an open event stream is dropped and reopened
    pub(crate) idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("boxlink/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl HttpConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the connect timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the initial reconnection delay of the event stream.
    ///
    /// Defaults to 3 seconds. A `retry:` field from the box takes precedence.
    #[must_use]
    pub const fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set how long an open event stream may stay silent.
    ///
    /// Defaults to 15 seconds. A box that reboots without closing the
    /// connection is only noticed through this limit.
    #[must_use]
    pub const fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(DEFAULT_TCP_KEEPALIVE)
            .build()
            .map_err(TransportError::Client)
    }
}
