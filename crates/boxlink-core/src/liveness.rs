//! Dead-man's-switch liveness timer.
//!
//! The box never acknowledges anything and the transport keeps reporting an
//! open connection long after data stops flowing, so freshness is derived
//! purely from arrival times: every decoded snapshot re-arms a deadline `T`
//! into the future, and the data counts as stale once the deadline passes.
//!
//! The timer itself is passive. The owner feeds it and waits on
//! [`wait_for_deadline`] in the same task that handles events, which makes
//! re-arming atomic with respect to expiry.

use std::future;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Re-armable deadline tracking snapshot freshness.
#[derive(Debug, Clone)]
pub struct LivenessTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl LivenessTimer {
    /// Create a disarmed timer with the given window.
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Pending deadline, `None` when disarmed.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record an arrival at `now`, replacing any pending deadline.
    pub fn feed(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a deadline is pending and has not yet passed at `now`.
    pub fn is_live(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Disarm and return `true` if the deadline has passed at `now`.
    ///
    /// Returns `false` when disarmed or when the deadline was pushed past
    /// `now` by a later [`feed`](Self::feed).
    pub fn expire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Sleep until `deadline`, or forever when there is none.
pub async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending::<()>().await,
    }
}
