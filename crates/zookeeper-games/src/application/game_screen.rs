//! The game screen reached from a map stop.
//!
//! Every game is still a placeholder that shows a spelling demo. Unknown
//! ids are not an error: they render the generic placeholder.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use zookeeper_core::clock::Clock;
use zookeeper_core::error::DomainError;
use zookeeper_core::flags::FlagStore;
use zookeeper_core::localization::Localizer;
use zookeeper_core::navigation::{GAME_SCREEN_PREFIX, record_screen_entry};
use zookeeper_core::router::Router;

use crate::domain::game::GameId;
use crate::domain::progress::GameProgress;

/// Word spelled out in the demo letter slots.
pub const DEMO_WORD: &str = "ELEPHANT";

/// Localization key of the title shown for unknown games.
pub const PLACEHOLDER_TITLE_KEY: &str = "game.placeholderTitle";

/// Localization key of the placeholder text; `{game}` is replaced with the
/// raw game id.
pub const PLACEHOLDER_TEXT_KEY: &str = "game.placeholderText";

/// What the game screen displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameScreenView {
    /// Text next to the back button.
    pub header: String,
    /// Large title above the demo.
    pub title: String,
    /// Placeholder instructions.
    pub instructions: String,
    /// One slot per letter of [`DEMO_WORD`].
    pub letter_slots: Vec<char>,
}

/// A mounted game screen.
pub struct GameScreen {
    raw_id: String,
    game: Option<GameId>,
    router: Arc<dyn Router>,
}

impl GameScreen {
    /// Mounts the screen for `raw_id`, recording the entry in the
    /// navigation store so the map can tell it is being returned to.
    #[instrument(skip(navigation, clock, router))]
    pub fn mount(
        raw_id: &str,
        navigation: &dyn FlagStore,
        clock: &dyn Clock,
        router: Arc<dyn Router>,
    ) -> Self {
        let game = raw_id.parse::<GameId>().ok();
        if game.is_none() {
            warn!("unknown game id, showing placeholder");
        }
        let screen = format!("{GAME_SCREEN_PREFIX}{raw_id}");
        if let Err(e) = record_screen_entry(navigation, &screen, clock.now_millis()) {
            warn!(error = %e, "failed to record game screen entry");
        }
        info!("game screen loaded");
        Self {
            raw_id: raw_id.to_owned(),
            game,
            router,
        }
    }

    /// The catalogued game, if the id was known.
    #[must_use]
    pub fn game(&self) -> Option<GameId> {
        self.game
    }

    /// The id the screen was opened with.
    #[must_use]
    pub fn raw_id(&self) -> &str {
        &self.raw_id
    }

    /// Builds the screen's texts.
    #[must_use]
    pub fn view(&self, localizer: &dyn Localizer) -> GameScreenView {
        let (header, title) = match self.game {
            Some(game) => {
                let title = localizer.t(game.title_key());
                (title.clone(), title)
            }
            None => (self.raw_id.clone(), localizer.t(PLACEHOLDER_TITLE_KEY)),
        };
        GameScreenView {
            header,
            title,
            instructions: localizer
                .t(PLACEHOLDER_TEXT_KEY)
                .replace("{game}", &self.raw_id),
            letter_slots: DEMO_WORD.chars().collect(),
        }
    }

    /// Returns to the previous screen.
    pub fn back(&self) {
        self.router.back();
    }

    /// Marks this screen's game completed in the shared progress.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownGame` for placeholder screens and
    /// `DomainError::Infrastructure` if the flag cannot be stored.
    pub fn complete(
        &self,
        progress: &mut GameProgress,
        store: &dyn FlagStore,
    ) -> Result<(), DomainError> {
        let game = self
            .game
            .ok_or_else(|| DomainError::UnknownGame(self.raw_id.clone()))?;
        progress.complete(game, store)?;
        info!(game = %game, "game completed");
        Ok(())
    }
}
