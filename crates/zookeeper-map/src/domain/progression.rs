//! Game progression model: the three stops on the map.

use zookeeper_core::localization::Localizer;
use zookeeper_games::domain::game::GameId;
use zookeeper_games::domain::progress::GameProgress;

/// One game as shown on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStop {
    /// Which game this stop opens.
    pub id: GameId,
    /// Localized title.
    pub title: String,
    /// Button emoji.
    pub emoji: &'static str,
    /// The game has been completed.
    pub is_completed: bool,
    /// The previous game has not been completed yet.
    pub is_locked: bool,
    /// Zero-based unlock order.
    pub order: usize,
}

/// Builds the stops from the shared completion flags.
///
/// Call again whenever the flags change; the result is a fresh snapshot.
/// The first stop is never locked and every later stop is locked exactly
/// while its predecessor is incomplete.
#[must_use]
pub fn build_game_stops(progress: &GameProgress, localizer: &dyn Localizer) -> [GameStop; 3] {
    GameId::ALL.map(|id| GameStop {
        id,
        title: localizer.t(id.title_key()),
        emoji: id.emoji(),
        is_completed: progress.is_completed(id),
        is_locked: id
            .previous()
            .is_some_and(|previous| !progress.is_completed(previous)),
        order: id.order(),
    })
}
