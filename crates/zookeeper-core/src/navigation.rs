//! Last-screen bookkeeping shared by every screen.

use crate::error::DomainError;
use crate::flags::{FlagStore, FlagValue};

/// Key holding the name of the most recently entered screen.
pub const LAST_SCREEN_KEY: &str = "lastScreen";

/// Key holding the entry time of that screen, in epoch milliseconds.
pub const LAST_NAVIGATION_TIME_KEY: &str = "lastNavigationTime";

/// Screen name recorded by the splash screen.
pub const SPLASH_SCREEN: &str = "index";

/// Screen name recorded by the map screen.
pub const MAP_SCREEN: &str = "map";

/// Prefix of every screen name recorded by a game screen.
pub const GAME_SCREEN_PREFIX: &str = "games/";

/// The last-screen pair as read from the navigation store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationRecord {
    /// Screen name, empty on a fresh install.
    pub last_screen: String,
    /// Entry time in epoch milliseconds, `0` on a fresh install.
    pub last_navigation_time: i64,
}

impl NavigationRecord {
    /// Reads the record, falling back to defaults for missing values.
    pub fn load(store: &dyn FlagStore) -> Self {
        Self {
            last_screen: store.get_string(LAST_SCREEN_KEY),
            last_navigation_time: store.get_number(LAST_NAVIGATION_TIME_KEY),
        }
    }
}

/// Records that `screen` was entered at `now` (epoch milliseconds).
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if either key cannot be stored.
pub fn record_screen_entry(
    store: &dyn FlagStore,
    screen: &str,
    now: i64,
) -> Result<(), DomainError> {
    store.set(LAST_SCREEN_KEY, FlagValue::from(screen))?;
    store.set(LAST_NAVIGATION_TIME_KEY, FlagValue::from(now))
}
