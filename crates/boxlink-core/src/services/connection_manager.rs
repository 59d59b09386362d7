//! Stream connection manager.
//!
//! Owns the single event connection to the box, decodes status events into
//! the [`StatusCache`], derives liveness from a dead-man's-switch timer and
//! dispatches the box's one-shot commands.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, trace, warn};

use crate::broadcast::{BroadcastCell, Subscription};
use crate::cache::StatusCache;
use crate::domain::{BoxCommand, StatusSnapshot};
use crate::liveness::{LivenessTimer, wait_for_deadline};
use crate::ports::{CommandSink, EventStream, ServerSentEvent, StatusEventSource};
use crate::settings::ClientSettings;

/// Live status client for one box.
///
/// Construct it once at the composition root and hand it (or an `Arc` of it)
/// to every consumer. Construction opens the event stream; dropping the
/// manager or calling [`shutdown`](Self::shutdown) stops the session.
pub struct ConnectionManager {
    cache: StatusCache,
    commands: Arc<dyn CommandSink>,
    cancel: CancellationToken,
    _session_guard: DropGuard,
}

impl ConnectionManager {
    /// Open the event stream and start the session task.
    ///
    /// Must be called from within a Tokio runtime. Transport problems never
    /// surface here; they only show up as [`is_connected`](Self::is_connected)
    /// going false.
    pub fn connect(
        settings: &ClientSettings,
        source: &dyn StatusEventSource,
        commands: Arc<dyn CommandSink>,
    ) -> Self {
        let cache = StatusCache::new();
        let cancel = CancellationToken::new();

        info!(
            base_url = %settings.base_url(),
            event = settings.event_name(),
            liveness_timeout_ms = settings.liveness_timeout().as_millis(),
            "Opening status stream"
        );
        let events = source.open();

        let session = StatusSession::new(settings, cache.clone());
        tokio::spawn(session.run(events, cancel.clone()));

        Self {
            cache,
            commands,
            _session_guard: cancel.clone().drop_guard(),
            cancel,
        }
    }

    /// Whether snapshots are arriving within the liveness window.
    ///
    /// This is the derived liveness flag, not the transport's socket state.
    pub fn is_connected(&self) -> bool {
        self.cache.is_connected()
    }

    /// The most recent snapshot, if any arrived yet.
    pub fn latest(&self) -> Option<StatusSnapshot> {
        self.cache.latest()
    }

    /// The snapshot cell consumers observe.
    pub const fn messages(&self) -> &BroadcastCell<Option<StatusSnapshot>> {
        self.cache.messages()
    }

    pub const fn cache(&self) -> &StatusCache {
        &self.cache
    }

    /// Observe snapshots, starting with the current one.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Option<StatusSnapshot>) + Send + Sync + 'static,
    {
        self.cache.subscribe(observer)
    }

    /// Observe liveness transitions, starting with the current state.
    pub fn subscribe_connection<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.cache.subscribe_connection(observer)
    }

    /// Ask the box to power down.
    ///
    /// Returns immediately. The returned handle may be awaited by callers
    /// that need to outlive the request (a CLI about to exit) and is safe to
    /// drop otherwise. Failures are logged, never retried.
    pub fn powerdown(&self) -> JoinHandle<()> {
        self.dispatch(BoxCommand::PowerDown)
    }

    /// Ask the box to switch off its wireless radio.
    ///
    /// Same contract as [`powerdown`](Self::powerdown).
    pub fn stop_wifi(&self) -> JoinHandle<()> {
        self.dispatch(BoxCommand::StopWifi)
    }

    /// Fire a command on its own task.
    pub fn dispatch(&self, command: BoxCommand) -> JoinHandle<()> {
        tokio::spawn(send_command(Arc::clone(&self.commands), command))
    }

    /// Stop the session task. The cache keeps its last values.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Send one command and swallow the outcome.
async fn send_command(commands: Arc<dyn CommandSink>, command: BoxCommand) {
    info!(%command, "Sending command");
    match commands.send(command).await {
        Ok(()) => debug!(%command, "Command delivered"),
        Err(e) => warn!(%command, error = %e, "Command failed, not retrying"),
    }
}

/// State owned by the session task: the only writer of the cache.
struct StatusSession {
    event_name: String,
    liveness: LivenessTimer,
    cache: StatusCache,
}

impl StatusSession {
    fn new(settings: &ClientSettings, cache: StatusCache) -> Self {
        Self {
            event_name: settings.event_name().to_string(),
            liveness: LivenessTimer::new(settings.liveness_timeout()),
            cache,
        }
    }

    /// Drive the session until cancelled.
    ///
    /// Events are polled before the deadline, so an event that is ready at
    /// the same time as the deadline re-arms the timer first.
    async fn run(mut self, mut events: EventStream, cancel: CancellationToken) {
        let mut stream_open = true;

        loop {
            let deadline = self.liveness.deadline();
            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!("Status session cancelled");
                    break;
                }
                next = events.next(), if stream_open => match next {
                    Some(event) => self.on_event(&event),
                    None => {
                        warn!("Status stream ended");
                        stream_open = false;
                    }
                },
                () = wait_for_deadline(deadline) => self.on_deadline(),
            }
        }
    }

    fn on_event(&mut self, event: &ServerSentEvent) {
        if !event.is(&self.event_name) {
            trace!(event = %event.event, "Ignoring event of another type");
            return;
        }
        self.handle_payload(&event.data);
    }

    /// Decode one payload and, on success, refresh liveness and publish.
    ///
    /// Returns whether the payload was accepted.
    fn handle_payload(&mut self, raw: &str) -> bool {
        let snapshot = match StatusSnapshot::decode(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Dropping malformed status event");
                return false;
            }
        };

        self.liveness.feed(Instant::now());
        if self.cache.set_connected(true) {
            info!("Status stream is live");
        }
        self.cache.publish(snapshot);
        true
    }

    fn on_deadline(&mut self) {
        if self.liveness.expire_if_due(Instant::now()) && self.cache.set_connected(false) {
            info!(
                window_ms = self.liveness.window().as_millis(),
                "No status within liveness window, marking stale"
            );
        }
    }
}
