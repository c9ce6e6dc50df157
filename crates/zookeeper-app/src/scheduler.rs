//! Tokio-backed `Scheduler`.
//!
//! Each timer is a spawned sleep that sends `(TimerId, E)` to the event
//! loop when it elapses. Cancelling aborts the task, so a cancelled timer
//! is never sent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::AbortHandle;
use zookeeper_core::scheduler::{Scheduler, TimerId};

/// Timers delivered to the event loop.
pub type TimerReceiver<E> = UnboundedReceiver<(TimerId, E)>;

/// A scheduler whose timers run on the current tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler<E> {
    next_id: AtomicU64,
    sender: UnboundedSender<(TimerId, E)>,
    tasks: Arc<Mutex<HashMap<TimerId, AbortHandle>>>,
}

impl<E: Send + 'static> TokioScheduler<E> {
    /// Creates a scheduler and the receiver its timers are delivered on.
    #[must_use]
    pub fn channel() -> (Self, TimerReceiver<E>) {
        let (sender, receiver) = unbounded_channel();
        let scheduler = Self {
            next_id: AtomicU64::new(1),
            sender,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        };
        (scheduler, receiver)
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<E: Send + 'static> Scheduler<E> for TokioScheduler<E> {
    /// Must be called from within a tokio runtime.
    fn schedule(&self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let sender = self.sender.clone();
        let tasks = Arc::clone(&self.tasks);
        // Hold the lock across the spawn so a zero delay cannot finish and
        // deregister before it is registered.
        let mut registered = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&id);
            // The receiver is gone only during shutdown.
            let _ = sender.send((id, event));
        });
        registered.insert(id, handle.abort_handle());
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
        {
            handle.abort();
        }
    }
}
