//! Shared completion flags.

use zookeeper_core::error::DomainError;
use zookeeper_core::flags::{FlagStore, FlagValue};

use super::game::GameId;

/// Which games the player has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameProgress {
    completed: [bool; 3],
}

impl GameProgress {
    /// Progress with the given games completed.
    #[must_use]
    pub fn with_completed(games: &[GameId]) -> Self {
        let mut progress = Self::default();
        for game in games {
            progress.completed[game.order()] = true;
        }
        progress
    }

    /// Reads every completion flag from `store`, defaulting to incomplete.
    pub fn load(store: &dyn FlagStore) -> Self {
        let mut progress = Self::default();
        for game in GameId::ALL {
            progress.completed[game.order()] = store.get_bool(game.completed_key());
        }
        progress
    }

    /// Whether `game` has been completed.
    #[must_use]
    pub fn is_completed(&self, game: GameId) -> bool {
        self.completed[game.order()]
    }

    /// Marks `game` completed and persists the flag.
    ///
    /// The in-memory flag is set even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the flag cannot be stored.
    pub fn complete(&mut self, game: GameId, store: &dyn FlagStore) -> Result<(), DomainError> {
        self.completed[game.order()] = true;
        store.set(game.completed_key(), FlagValue::from(true))
    }
}
