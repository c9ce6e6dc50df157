//! Channel-backed `Router`.
//!
//! Screens call the router synchronously while handling an event; the shell
//! drains the requests afterwards, so a screen is never unmounted from
//! inside its own handler.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;
use zookeeper_core::router::Router;

/// Route path of the map screen.
pub const MAP_ROUTE: &str = "/map";

/// A navigation request made by a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequest {
    /// Open `path` on top of the current screen.
    Push(String),
    /// Return to the previous screen.
    Back,
    /// Replace the current screen with `path`.
    Redirect(String),
}

/// A router that queues requests for the shell.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    sender: UnboundedSender<RouteRequest>,
}

impl ChannelRouter {
    /// Creates a router and the receiver its requests are queued on.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<RouteRequest>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, request: RouteRequest) {
        debug!(?request, "route requested");
        // The shell owns the receiver for as long as screens exist.
        let _ = self.sender.send(request);
    }
}

impl Router for ChannelRouter {
    fn push(&self, path: &str) {
        self.send(RouteRequest::Push(path.to_owned()));
    }

    fn back(&self) {
        self.send(RouteRequest::Back);
    }

    fn redirect(&self, path: &str) {
        self.send(RouteRequest::Redirect(path.to_owned()));
    }
}
