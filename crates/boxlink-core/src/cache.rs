//! Current-status cache shared by every display consumer.

use crate::broadcast::{BroadcastCell, Subscription};
use crate::domain::StatusSnapshot;

/// Latest snapshot plus the derived liveness flag.
///
/// Starts out empty and disconnected. Only the connection session writes to
/// it; consumers subscribe or read.
#[derive(Clone)]
pub struct StatusCache {
    latest: BroadcastCell<Option<StatusSnapshot>>,
    connected: BroadcastCell<bool>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self {
            latest: BroadcastCell::new(None),
            connected: BroadcastCell::new(false),
        }
    }

    /// The snapshot cell (`None` until the first snapshot arrives).
    pub const fn messages(&self) -> &BroadcastCell<Option<StatusSnapshot>> {
        &self.latest
    }

    pub fn latest(&self) -> Option<StatusSnapshot> {
        self.latest.get()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Observe snapshots, starting with the current one.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Option<StatusSnapshot>) + Send + Sync + 'static,
    {
        self.latest.subscribe(observer)
    }

    /// Observe liveness transitions, starting with the current state.
    pub fn subscribe_connection<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.connected.subscribe(observer)
    }

    pub(crate) fn publish(&self, snapshot: StatusSnapshot) {
        self.latest.publish(Some(snapshot));
    }

    /// Returns whether the flag actually changed.
    pub(crate) fn set_connected(&self, connected: bool) -> bool {
        self.connected.publish_if_changed(connected)
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn snapshot(heap: i64) -> StatusSnapshot {
        StatusSnapshot::decode(&format!(
            r#"{{"power":{{"voltage":3700,"level":2,"state":0}},"audio":{{"isPlaying":true,"currentTrack":1,"currentAlbum":"a","volume":3}},"heap":{heap}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_starts_empty_and_disconnected() {
        let cache = StatusCache::new();
        assert_eq!(cache.latest(), None);
        assert!(!cache.is_connected());
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let cache = StatusCache::new();
        cache.publish(snapshot(1));
        cache.publish(snapshot(2));
        assert_eq!(cache.latest().map(|s| s.heap), Some(2));
    }

    #[test]
    fn test_connection_observers_see_transitions_only() {
        let cache = StatusCache::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = cache.subscribe_connection(move |c| sink.lock().unwrap().push(*c));

        assert!(cache.set_connected(true));
        assert!(!cache.set_connected(true));
        assert!(cache.set_connected(false));

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
    }
}
