//! Test router: records navigation requests.

use std::sync::Mutex;

use zookeeper_core::router::Router;

/// One call made against [`RecordingRouter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteCall {
    /// `push(path)`.
    Push(String),
    /// `back()`.
    Back,
    /// `redirect(path)`.
    Redirect(String),
}

/// A router that records calls without navigating anywhere.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    calls: Mutex<Vec<RouteCall>>,
}

impl RecordingRouter {
    /// Returns a snapshot of all calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<RouteCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Router for RecordingRouter {
    fn push(&self, path: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(RouteCall::Push(path.to_owned()));
    }

    fn back(&self) {
        self.calls.lock().unwrap().push(RouteCall::Back);
    }

    fn redirect(&self, path: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(RouteCall::Redirect(path.to_owned()));
    }
}
