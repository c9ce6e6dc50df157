//! Shared test doubles and utilities for the Zoo Keeper app.

mod audio;
mod clock;
mod flags;
mod localization;
mod router;
mod scheduler;

pub use audio::{AudioCall, RecordingAudio};
pub use clock::ManualClock;
pub use flags::FailingFlagStore;
pub use localization::KeyLocalizer;
pub use router::{RecordingRouter, RouteCall};
pub use scheduler::ManualScheduler;
