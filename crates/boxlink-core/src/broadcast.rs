//! Single-slot broadcast cell with synchronous observers.
//!
//! A [`BroadcastCell`] holds exactly one value. Publishing replaces it and
//! notifies every registered observer before `publish` returns; a new observer
//! is immediately handed the current value (late-join replay of one value, not
//! history). Handles are cheap to clone and all point at the same slot.
//!
//! Observers run on the publishing thread and must not publish to or
//! subscribe on the same cell from inside their callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    value: T,
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
}

struct Inner<T> {
    registry: Mutex<Registry<T>>,
    /// Serializes publish and late-join replay so observers see values in order.
    delivery: Mutex<()>,
}

impl<T> Inner<T> {
    fn registry(&self) -> MutexGuard<'_, Registry<T>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removal hook a [`Subscription`] uses without knowing the cell's value type.
trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

impl<T: Send> Unsubscribe for Inner<T> {
    fn unsubscribe(&self, id: u64) {
        self.registry().observers.retain(|(observer_id, _)| *observer_id != id);
    }
}

/// Single-slot, multi-observer value cell.
pub struct BroadcastCell<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for BroadcastCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BroadcastCell<T>
where
    T: Clone + Send + 'static,
{
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry {
                    value: initial,
                    observers: Vec::new(),
                    next_id: 0,
                }),
                delivery: Mutex::new(()),
            }),
        }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.inner.registry().value.clone()
    }

    /// Replace the value and notify all observers in subscription order.
    pub fn publish(&self, value: T) {
        let _delivery = self.inner.delivery();
        let observers = {
            let mut registry = self.inner.registry();
            registry.value = value.clone();
            registry
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect::<Vec<_>>()
        };

        for observer in observers {
            observer(&value);
        }
    }

    /// Publish only if `value` differs from the current one.
    ///
    /// Returns whether a publish happened.
    pub fn publish_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        if self.inner.registry().value == value {
            return false;
        }
        self.publish(value);
        true
    }

    /// Register an observer and hand it the current value right away.
    ///
    /// The observer stays registered until the returned [`Subscription`] is
    /// cancelled or dropped.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(observer);

        let _delivery = self.inner.delivery();
        let (id, current) = {
            let mut registry = self.inner.registry();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.push((id, Arc::clone(&observer)));
            (id, registry.value.clone())
        };
        observer(&current);

        let inner: Arc<dyn Unsubscribe> = self.inner.clone();
        Subscription {
            id,
            cell: Arc::downgrade(&inner),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry().observers.len()
    }
}

impl<T> Default for BroadcastCell<T>
where
    T: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Handle to a registered observer.
///
/// Cancelling stops further notifications; cancelling twice is a no-op.
/// Dropping the handle cancels it.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    id: u64,
    cell: Weak<dyn Unsubscribe>,
    cancelled: AtomicBool,
}

impl Subscription {
    /// Stop notifying this observer.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(cell) = self.cell.upgrade() {
            cell.unsubscribe(self.id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
