//! Application handlers for the Map context.

pub mod map_screen;
