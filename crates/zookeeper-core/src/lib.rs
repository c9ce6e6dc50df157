//! Zoo Keeper Core: shared abstractions.
//!
//! This crate defines the traits and value types every screen depends on:
//! time, durable flags, navigation bookkeeping, timers, and the external
//! audio, routing and localization collaborators. It contains no
//! infrastructure code.

pub mod audio;
pub mod clock;
pub mod error;
pub mod flags;
pub mod localization;
pub mod navigation;
pub mod router;
pub mod scheduler;
