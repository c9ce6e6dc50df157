//! The game catalogue.

use std::fmt;
use std::str::FromStr;

use zookeeper_core::error::DomainError;
use zookeeper_core::navigation::GAME_SCREEN_PREFIX;

/// One of the three mini-games, in unlock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameId {
    /// Label the animals at the zoo entrance.
    AnimalLabeling,
    /// Assemble the rock-formation puzzle.
    PuzzleBuilder,
    /// Answer care questions at the elephant enclosure.
    KnowledgeCare,
}

impl GameId {
    /// Every game, in unlock order.
    pub const ALL: [Self; 3] = [Self::AnimalLabeling, Self::PuzzleBuilder, Self::KnowledgeCare];

    /// The identifier used in routes and storage keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnimalLabeling => "animalLabeling",
            Self::PuzzleBuilder => "puzzleBuilder",
            Self::KnowledgeCare => "knowledgeCare",
        }
    }

    /// Zero-based position in the unlock order.
    #[must_use]
    pub fn order(self) -> usize {
        match self {
            Self::AnimalLabeling => 0,
            Self::PuzzleBuilder => 1,
            Self::KnowledgeCare => 2,
        }
    }

    /// The game that must be completed before this one unlocks.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::AnimalLabeling => None,
            Self::PuzzleBuilder => Some(Self::AnimalLabeling),
            Self::KnowledgeCare => Some(Self::PuzzleBuilder),
        }
    }

    /// Map-button emoji.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::AnimalLabeling => "🪧",
            Self::PuzzleBuilder => "🧩",
            Self::KnowledgeCare => "🦒",
        }
    }

    /// Localization key of the game's title.
    #[must_use]
    pub fn title_key(self) -> &'static str {
        match self {
            Self::AnimalLabeling => "games.animalLabeling.title",
            Self::PuzzleBuilder => "games.puzzleBuilder.title",
            Self::KnowledgeCare => "games.knowledgeCare.title",
        }
    }

    /// Storage key of the game's completion flag.
    #[must_use]
    pub fn completed_key(self) -> &'static str {
        match self {
            Self::AnimalLabeling => "animalLabeling.completed",
            Self::PuzzleBuilder => "puzzleBuilder.completed",
            Self::KnowledgeCare => "knowledgeCare.completed",
        }
    }

    /// Router path of the game screen.
    #[must_use]
    pub fn route(self) -> String {
        format!("/{GAME_SCREEN_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DomainError::UnknownGame(s.to_owned()))
    }
}
