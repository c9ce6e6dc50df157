//! Cancellable one-shot timers.

use std::fmt;
use std::time::Duration;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Schedules events of type `E` to be delivered back to the owner after a
/// delay.
///
/// Delivery happens on the owner's event loop: the scheduler hands back the
/// `(TimerId, E)` pair and the owner decides whether the timer is still
/// live. A cancelled timer is never delivered.
pub trait Scheduler<E>: Send + Sync {
    /// Schedules `event` to fire once after `delay`.
    fn schedule(&self, delay: Duration, event: E) -> TimerId;

    /// Cancels a pending timer. Cancelling a fired or unknown timer is a
    /// no-op.
    fn cancel(&self, id: TimerId);
}
