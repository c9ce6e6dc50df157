//! Zoo Keeper: Games context.
//!
//! Owns the ordered game catalogue, the shared completion flags every
//! screen reads, and the game screen reached from the map.

pub mod application;
pub mod domain;
