//! Application handlers for the Games context.

pub mod game_screen;
