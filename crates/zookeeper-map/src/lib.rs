//! Zoo Keeper: Map context.
//!
//! Responsible for the map screen: deciding where the player came from,
//! sequencing the welcome overlay, audio and instructions, and presenting
//! the three game stops with their lock state.

pub mod application;
pub mod domain;
