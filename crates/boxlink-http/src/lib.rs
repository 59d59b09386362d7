//! HTTP adapters for the boxlink core ports.
//!
//! - [`SseEventSource`] implements `StatusEventSource` over a reconnecting
//!   `text/event-stream` connection
//! - [`HttpCommandSink`] implements `CommandSink` with plain `POST` requests
//! - [`SseDecoder`] is the incremental event-stream parser both rely on
//!
//! reqwest types never leave this crate; failures are mapped to core port
//! errors at the boundary.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod commands;
mod config;
mod error;
mod sse;
mod transport;

// ============================================================================
// Public API
// ============================================================================

pub use commands::HttpCommandSink;
pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_RECONNECT_DELAY, HttpConfig,
};
pub use error::TransportError;
pub use sse::{DEFAULT_MAX_LINE_LEN, SseDecoder};
pub use transport::SseEventSource;

// Silence unused dev-dependency warnings
#[cfg(test)]
use axum as _;
