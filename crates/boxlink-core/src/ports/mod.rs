//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or other HTTP types in any signature
//! - Event sources own reconnection; the core opens them exactly once
//! - Command sinks report failures, the core decides whether to surface them

pub mod command_sink;
pub mod event_source;

pub use command_sink::{CommandError, CommandSink, NoopCommandSink};
pub use event_source::{EventStream, ServerSentEvent, StatusEventSource};
