//! Onboarding state machine for one visit to the map.
//!
//! `Welcome → Transitioning → MapActive`, advanced only by the player's
//! start action and the reveal timer. The session never performs I/O: it
//! records [`MapEffect`]s that the screen handler executes.

use std::mem;
use std::time::Duration;

use super::navigation::NavigationClassification;

/// Instruction cue played on the map.
pub const MAP_INSTRUCTIONS_ID: &str = "map1heb";

/// Welcome exit animation length; map content appears when it ends.
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Pause between the map appearing and the instructions after a start.
pub const START_INSTRUCTIONS_DELAY: Duration = Duration::from_millis(500);

/// Pause before instructions auto-play on a visit that skipped the welcome.
pub const AUTO_INSTRUCTIONS_DELAY: Duration = Duration::from_millis(1000);

/// Where the visit is in the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPhase {
    /// The welcome overlay is showing.
    Welcome,
    /// The overlay is animating out and the map is not shown yet.
    Transitioning,
    /// The map content is showing. Terminal for the visit.
    MapActive,
}

/// Visibility flags for one visit.
///
/// After entry exactly one of `show_welcome` and `show_map_content` is set;
/// both are clear only while transitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnboardingState {
    /// The welcome overlay is visible.
    pub show_welcome: bool,
    /// The map header, stops and map-only buttons are visible.
    pub show_map_content: bool,
    /// Instructions have been played during this visit.
    pub instructions_played: bool,
}

/// Timers the session asks to be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapTimer {
    /// Shows the map once the welcome has animated out.
    RevealMap,
    /// Plays instructions after a start.
    StartInstructions,
    /// Plays instructions on a visit that entered with the map showing.
    AutoInstructions,
}

impl MapTimer {
    /// How long after scheduling the timer fires.
    #[must_use]
    pub fn delay(self) -> Duration {
        match self {
            Self::RevealMap => REVEAL_DELAY,
            Self::StartInstructions => START_INSTRUCTIONS_DELAY,
            Self::AutoInstructions => AUTO_INSTRUCTIONS_DELAY,
        }
    }
}

/// Side effects recorded by the session, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEffect {
    /// Persist `hasShownWelcome = true`.
    PersistWelcomeShown,
    /// Start background music.
    PlayBackgroundMusic,
    /// Play [`MAP_INSTRUCTIONS_ID`].
    PlayInstructions {
        /// Play even if the cue was played recently.
        force: bool,
    },
    /// Schedule a timer.
    Schedule(MapTimer),
}

/// The state machine for one visit.
#[derive(Debug)]
pub struct OnboardingSession {
    state: OnboardingState,
    navigation: NavigationClassification,
    entered_map_active: bool,
    audio_ready: bool,
    background_music_started: bool,
    auto_instructions_scheduled: bool,
    uncommitted_effects: Vec<MapEffect>,
}

impl OnboardingSession {
    /// Runs the entry action.
    ///
    /// The welcome shows on a first-ever visit and on every splash arrival.
    /// A new visit always starts with instructions unplayed, which is what
    /// a splash arrival requires.
    #[must_use]
    pub fn enter(has_shown_welcome: bool, navigation: NavigationClassification) -> Self {
        let show_welcome = navigation.came_from_splash || !has_shown_welcome;
        Self {
            state: OnboardingState {
                show_welcome,
                show_map_content: !show_welcome,
                instructions_played: false,
            },
            navigation,
            entered_map_active: !show_welcome,
            audio_ready: false,
            background_music_started: false,
            auto_instructions_scheduled: false,
            uncommitted_effects: Vec::new(),
        }
    }

    /// Current visibility flags.
    #[must_use]
    pub fn state(&self) -> OnboardingState {
        self.state
    }

    /// The classification the visit was entered with.
    #[must_use]
    pub fn navigation(&self) -> NavigationClassification {
        self.navigation
    }

    /// Current phase, derived from the visibility flags.
    #[must_use]
    pub fn phase(&self) -> OnboardingPhase {
        match (self.state.show_welcome, self.state.show_map_content) {
            (true, _) => OnboardingPhase::Welcome,
            (false, false) => OnboardingPhase::Transitioning,
            (false, true) => OnboardingPhase::MapActive,
        }
    }

    /// Handles the player's start action. Only accepted in `Welcome`.
    ///
    /// Returns whether the action was accepted.
    pub fn start(&mut self) -> bool {
        if self.phase() != OnboardingPhase::Welcome {
            return false;
        }
        self.state.show_welcome = false;
        self.uncommitted_effects.push(MapEffect::PersistWelcomeShown);
        self.uncommitted_effects
            .push(MapEffect::Schedule(MapTimer::RevealMap));
        true
    }

    /// Feeds the latest audio readiness reading and reacts to it.
    pub fn audio_readiness(&mut self, ready: bool) {
        self.observe_audio(ready);
        self.react_to_audio();
    }

    /// Records the latest audio readiness reading without reacting to it.
    ///
    /// Timers read this value, so hosts refresh it before delivering one.
    pub fn observe_audio(&mut self, ready: bool) {
        self.audio_ready = ready;
    }

    /// Handles a fired timer.
    pub fn timer_fired(&mut self, timer: MapTimer) {
        match timer {
            MapTimer::RevealMap => {
                if self.phase() != OnboardingPhase::Transitioning {
                    return;
                }
                self.state.show_map_content = true;
                if self.audio_ready {
                    self.background_music_started = true;
                    self.uncommitted_effects.push(MapEffect::PlayBackgroundMusic);
                    self.uncommitted_effects
                        .push(MapEffect::Schedule(MapTimer::StartInstructions));
                }
            }
            MapTimer::StartInstructions | MapTimer::AutoInstructions => {
                self.play_instructions();
            }
        }
    }

    /// Replays the instructions on request. Only available while the map
    /// content, and with it the instructions button, is showing.
    ///
    /// Returns whether playback was requested.
    pub fn request_instructions(&mut self) -> bool {
        if self.phase() != OnboardingPhase::MapActive {
            return false;
        }
        self.play_instructions();
        true
    }

    /// Effects recorded since the last [`OnboardingSession::take_effects`].
    #[must_use]
    pub fn uncommitted_effects(&self) -> &[MapEffect] {
        &self.uncommitted_effects
    }

    /// Drains the recorded effects.
    pub fn take_effects(&mut self) -> Vec<MapEffect> {
        mem::take(&mut self.uncommitted_effects)
    }

    fn play_instructions(&mut self) {
        self.uncommitted_effects
            .push(MapEffect::PlayInstructions { force: true });
        self.state.instructions_played = true;
    }

    fn react_to_audio(&mut self) {
        if !self.audio_ready || self.phase() != OnboardingPhase::MapActive {
            return;
        }
        if !self.background_music_started {
            self.background_music_started = true;
            self.uncommitted_effects.push(MapEffect::PlayBackgroundMusic);
        }
        // Unreachable in practice: a splash arrival always enters in
        // `Welcome`, so `entered_map_active` and `came_from_splash` are
        // never both set. Kept as the documented auto-play rule.
        if self.entered_map_active
            && !self.auto_instructions_scheduled
            && !self.state.instructions_played
            && self.navigation.came_from_splash
            && !self.navigation.returning_from_game
        {
            self.auto_instructions_scheduled = true;
            self.uncommitted_effects
                .push(MapEffect::Schedule(MapTimer::AutoInstructions));
        }
    }
}
