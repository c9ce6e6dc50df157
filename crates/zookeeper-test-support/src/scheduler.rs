//! Test scheduler: timers fire only when the test advances time.

use std::sync::Mutex;
use std::time::Duration;

use zookeeper_core::scheduler::{Scheduler, TimerId};

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

#[derive(Debug)]
struct Inner<E> {
    elapsed: Duration,
    next_id: u64,
    pending: Vec<Pending<E>>,
    cancelled: Vec<TimerId>,
}

/// A scheduler driven by virtual time.
///
/// Nothing fires on its own: the test calls [`ManualScheduler::fire_next`]
/// or [`ManualScheduler::advance`] and hands the returned timers to the
/// code under test.
#[derive(Debug)]
pub struct ManualScheduler<E> {
    inner: Mutex<Inner<E>>,
}

impl<E> Default for ManualScheduler<E> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                elapsed: Duration::ZERO,
                next_id: 1,
                pending: Vec::new(),
                cancelled: Vec::new(),
            }),
        }
    }
}

impl<E> ManualScheduler<E> {
    /// Creates a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().unwrap().elapsed
    }

    /// Jumps to the earliest pending timer and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fire_next(&self) -> Option<(TimerId, E)> {
        let mut inner = self.inner.lock().unwrap();
        let index = inner
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        let fired = inner.pending.remove(index);
        inner.elapsed = inner.elapsed.max(fired.due);
        Some((fired.id, fired.event))
    }

    /// Moves virtual time forward by `by` and returns every timer now due,
    /// earliest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn advance(&self, by: Duration) -> Vec<(TimerId, E)> {
        let mut inner = self.inner.lock().unwrap();
        inner.elapsed += by;
        let now = inner.elapsed;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            inner.pending.drain(..).partition(|p| p.due <= now);
        inner.pending = rest;
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| (p.id, p.event)).collect()
    }

    /// Number of timers scheduled and neither fired nor cancelled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }

    /// Ids passed to `cancel` that were still pending at the time.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cancelled(&self) -> Vec<TimerId> {
        self.inner.lock().unwrap().cancelled.clone()
    }
}

impl<E: Send> Scheduler<E> for ManualScheduler<E> {
    fn schedule(&self, delay: Duration, event: E) -> TimerId {
        let mut inner = self.inner.lock().unwrap();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let due = inner.elapsed + delay;
        inner.pending.push(Pending { id, due, event });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.pending.len();
        inner.pending.retain(|p| p.id != id);
        if inner.pending.len() < before {
            inner.cancelled.push(id);
        }
    }
}
