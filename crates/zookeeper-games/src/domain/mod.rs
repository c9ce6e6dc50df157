//! Domain types for the Games context.

pub mod game;
pub mod progress;
