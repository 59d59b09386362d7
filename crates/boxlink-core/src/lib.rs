//! Core domain types, ports and live status synchronization for boxlink.
//!
//! This crate owns everything that does not touch the network directly:
//!
//! - [`domain`] - status snapshots and control commands
//! - [`ports`] - traits the adapters implement (event source, command sink)
//! - [`broadcast`] - the single-slot observer cell consumers read from
//! - [`liveness`] - the dead-man's-switch timer behind `is_connected()`
//! - [`services`] - the connection manager tying the above together
//! - [`settings`] - client configuration
//!
//! Adapters (`boxlink-http`) and the composition root (`boxlink-cli`) depend
//! on this crate; it depends on none of them.

#![deny(unused_crate_dependencies)]

pub mod broadcast;
pub mod cache;
pub mod domain;
pub mod liveness;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use broadcast::{BroadcastCell, Subscription};
pub use cache::StatusCache;
pub use domain::{
    AudioStatus, BatteryLevel, BoxCommand, DecodeError, PowerState, PowerStatus, StatusSnapshot,
};
pub use liveness::LivenessTimer;
pub use ports::{
    CommandError, CommandSink, EventStream, NoopCommandSink, ServerSentEvent, StatusEventSource,
};
pub use services::ConnectionManager;
pub use settings::{
    ClientSettings, DEFAULT_BASE_URL, DEFAULT_EVENT_NAME, DEFAULT_EVENTS_PATH,
    DEFAULT_LIVENESS_TIMEOUT, SettingsError, resolve_base_url,
};

// Silence unused dev-dependency warnings for crates only used by tests/
#[cfg(test)]
use tokio_stream as _;
