//! Server-push event source port.

use std::pin::Pin;

use futures_util::Stream;

/// Event type a server-sent event carries when the server names none.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSentEvent {
    /// Event type (`event:` field), `"message"` when absent.
    pub event: String,
    /// Payload (`data:` lines joined with `\n`).
    pub data: String,
    /// Last event ID in effect when the event was dispatched.
    pub id: Option<String>,
}

impl ServerSentEvent {
    /// Create a named event without an ID.
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
            id: None,
        }
    }

    /// Whether this event has the given type.
    pub fn is(&self, event: &str) -> bool {
        self.event == event
    }
}

/// Endless stream of events from the box.
pub type EventStream = Pin<Box<dyn Stream<Item = ServerSentEvent> + Send + 'static>>;

/// Source of the box's status events.
///
/// `open` is called exactly once per connection manager. The returned stream
/// is expected to survive transport failures by reconnecting internally; it
/// never yields errors, and failures only show up as a gap in events.
pub trait StatusEventSource: Send + Sync {
    /// Open the long-lived event connection.
    fn open(&self) -> EventStream;
}
