//! Zoo Keeper terminal shell.
//!
//! Hosts the splash, map and game screens behind a line-oriented prompt,
//! wiring them to file-backed flags, tokio timers and a simulated audio
//! orchestrator.

pub mod audio;
pub mod config;
pub mod error;
pub mod localization;
pub mod router;
pub mod scheduler;
pub mod shell;
