//! Domain logic for the Map context. Everything here is pure.

pub mod navigation;
pub mod onboarding;
pub mod progression;
