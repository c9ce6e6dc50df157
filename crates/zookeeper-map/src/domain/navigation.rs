//! Navigation-source classification.

use zookeeper_core::flags::{FlagStore, HAS_SHOWN_WELCOME_KEY};
use zookeeper_core::navigation::{GAME_SCREEN_PREFIX, NavigationRecord, SPLASH_SCREEN};

/// An arrival from the splash screen must happen within this many
/// milliseconds of the splash recording its entry.
pub const SPLASH_WINDOW_MS: i64 = 2000;

/// Everything the map reads from durable storage on entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagRecord {
    /// Whether the player has ever dismissed the welcome overlay.
    pub has_shown_welcome: bool,
    /// The previous screen and when it was entered.
    pub navigation: NavigationRecord,
}

impl FlagRecord {
    /// Reads the record from the settings and navigation stores.
    pub fn load(settings: &dyn FlagStore, navigation: &dyn FlagStore) -> Self {
        Self {
            has_shown_welcome: settings.get_bool(HAS_SHOWN_WELCOME_KEY),
            navigation: NavigationRecord::load(navigation),
        }
    }
}

/// Where the player arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationClassification {
    /// The splash screen handed over within [`SPLASH_WINDOW_MS`].
    pub came_from_splash: bool,
    /// The previous screen was a game.
    pub returning_from_game: bool,
}

/// Classifies the arrival described by `record` at time `now` (epoch
/// milliseconds).
///
/// Must run before the map records its own entry, which overwrites the
/// inputs.
#[must_use]
pub fn classify(record: &NavigationRecord, now: i64) -> NavigationClassification {
    let elapsed = now.saturating_sub(record.last_navigation_time);
    NavigationClassification {
        came_from_splash: record.last_screen == SPLASH_SCREEN && elapsed < SPLASH_WINDOW_MS,
        returning_from_game: record.last_screen.starts_with(GAME_SCREEN_PREFIX),
    }
}
