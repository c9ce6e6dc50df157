//! The map screen handler.
//!
//! Runs the onboarding session for one visit: reads the flags, classifies
//! the arrival, records the map entry, and executes the session's effects
//! against the audio, settings store and scheduler. Every timer it
//! schedules is owned by the screen and cancelled when the screen goes
//! away.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{Span, debug, info, info_span, warn};
use uuid::Uuid;
use zookeeper_core::audio::AudioOrchestrator;
use zookeeper_core::clock::Clock;
use zookeeper_core::flags::{FlagStore, FlagValue, HAS_SHOWN_WELCOME_KEY};
use zookeeper_core::localization::Localizer;
use zookeeper_core::navigation::{MAP_SCREEN, record_screen_entry};
use zookeeper_core::router::Router;
use zookeeper_core::scheduler::{Scheduler, TimerId};
use zookeeper_games::domain::game::GameId;
use zookeeper_games::domain::progress::GameProgress;

use crate::domain::navigation::{FlagRecord, NavigationClassification, classify};
use crate::domain::onboarding::{
    MAP_INSTRUCTIONS_ID, MapEffect, MapTimer, OnboardingPhase, OnboardingSession, OnboardingState,
};
use crate::domain::progression::{GameStop, build_game_stops};

/// Collaborators injected into every map visit.
#[derive(Clone)]
pub struct MapContext {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// The `app-settings` store.
    pub settings: Arc<dyn FlagStore>,
    /// The `navigation-state` store.
    pub navigation: Arc<dyn FlagStore>,
    /// Background music and instruction playback.
    pub audio: Arc<dyn AudioOrchestrator>,
    /// Screen navigation.
    pub router: Arc<dyn Router>,
    /// String lookup.
    pub localizer: Arc<dyn Localizer>,
    /// Timer source for the onboarding delays.
    pub scheduler: Arc<dyn Scheduler<MapTimer>>,
}

/// A mounted map screen.
pub struct MapScreen {
    ctx: MapContext,
    visit_id: Uuid,
    span: Span,
    session: OnboardingSession,
    stops: [GameStop; 3],
    timers: HashMap<TimerId, MapTimer>,
    mounted: bool,
}

impl MapScreen {
    /// Mounts the screen and runs the entry action.
    pub fn mount(ctx: MapContext, progress: &GameProgress) -> Self {
        let visit_id = Uuid::new_v4();
        let span = info_span!("map_screen", %visit_id);
        let guard = span.enter();

        let flags = FlagRecord::load(ctx.settings.as_ref(), ctx.navigation.as_ref());
        let now = ctx.clock.now_millis();
        let classification = classify(&flags.navigation, now);
        info!(
            last_screen = %flags.navigation.last_screen,
            came_from_splash = classification.came_from_splash,
            returning_from_game = classification.returning_from_game,
            since_last_ms = now.saturating_sub(flags.navigation.last_navigation_time),
            "navigation source checked"
        );

        let session = OnboardingSession::enter(flags.has_shown_welcome, classification);
        if let Err(e) = record_screen_entry(ctx.navigation.as_ref(), MAP_SCREEN, now) {
            warn!(error = %e, "failed to record map entry");
        }
        let stops = build_game_stops(progress, ctx.localizer.as_ref());
        drop(guard);

        let mut screen = Self {
            ctx,
            visit_id,
            span,
            session,
            stops,
            timers: HashMap::new(),
            mounted: true,
        };
        screen.poll_audio();
        screen
    }

    /// Identifies this visit in logs.
    #[must_use]
    pub fn visit_id(&self) -> Uuid {
        self.visit_id
    }

    /// Current visibility flags.
    #[must_use]
    pub fn state(&self) -> OnboardingState {
        self.session.state()
    }

    /// Current onboarding phase.
    #[must_use]
    pub fn phase(&self) -> OnboardingPhase {
        self.session.phase()
    }

    /// How the player arrived.
    #[must_use]
    pub fn navigation(&self) -> NavigationClassification {
        self.session.navigation()
    }

    /// The stops as of the last progress refresh.
    #[must_use]
    pub fn stops(&self) -> &[GameStop; 3] {
        &self.stops
    }

    /// Number of scheduled timers that have neither fired nor been
    /// cancelled.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Handles the welcome's start button.
    ///
    /// Returns whether the welcome was showing.
    pub fn start(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let accepted = self.session.start();
        if accepted {
            info!("welcome dismissed");
        } else {
            debug!(phase = ?self.session.phase(), "start ignored");
        }
        self.apply_effects();
        accepted
    }

    /// Re-reads audio readiness and reacts to it.
    pub fn poll_audio(&mut self) {
        if !self.mounted {
            return;
        }
        let span = self.span.clone();
        let _guard = span.enter();
        self.session.audio_readiness(self.ctx.audio.is_ready());
        self.apply_effects();
    }

    /// Delivers a fired timer.
    ///
    /// Timers this screen does not own, including any that fire after
    /// unmount, are suppressed. Returns whether the timer was delivered.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let timer = match self.timers.remove(&id) {
            Some(timer) if self.mounted => timer,
            _ => {
                debug!(%id, "suppressed timer");
                return false;
            }
        };
        debug!(%id, ?timer, "timer fired");
        self.session.observe_audio(self.ctx.audio.is_ready());
        self.session.timer_fired(timer);
        self.apply_effects();
        true
    }

    /// Handles the instructions button. Returns whether playback was
    /// requested.
    pub fn request_instructions(&mut self) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        let requested = self.session.request_instructions();
        self.apply_effects();
        requested
    }

    /// Rebuilds the stops after the completion flags changed.
    pub fn refresh_progress(&mut self, progress: &GameProgress) {
        self.stops = build_game_stops(progress, self.ctx.localizer.as_ref());
    }

    /// Handles a tap on a stop. Locked stops, and every stop while the map
    /// content is hidden, do nothing.
    ///
    /// Returns whether navigation was requested.
    pub fn select_game(&self, id: GameId) -> bool {
        let _guard = self.span.enter();
        if self.session.phase() != OnboardingPhase::MapActive {
            debug!(game = %id, phase = ?self.session.phase(), "stops are hidden");
            return false;
        }
        let Some(stop) = self.stops.iter().find(|stop| stop.id == id) else {
            return false;
        };
        if stop.is_locked {
            debug!(game = %id, "locked stop selected");
            return false;
        }
        info!(game = %id, "selected game");
        self.ctx.router.push(&id.route());
        true
    }

    /// Tears the screen down, cancelling every pending timer.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let _guard = self.span.enter();
        self.mounted = false;
        for (id, timer) in self.timers.drain() {
            debug!(%id, ?timer, "cancelling timer");
            self.ctx.scheduler.cancel(id);
        }
        info!("map unmounted");
    }

    fn apply_effects(&mut self) {
        for effect in self.session.take_effects() {
            match effect {
                MapEffect::PersistWelcomeShown => {
                    if let Err(e) = self
                        .ctx
                        .settings
                        .set(HAS_SHOWN_WELCOME_KEY, FlagValue::from(true))
                    {
                        warn!(error = %e, "failed to persist welcome flag");
                    }
                }
                MapEffect::PlayBackgroundMusic => {
                    debug!("starting background music");
                    self.ctx.audio.play_background_music();
                }
                MapEffect::PlayInstructions { force } => {
                    debug!(force, "playing instructions");
                    self.ctx
                        .audio
                        .play_instructions(MAP_INSTRUCTIONS_ID, force);
                }
                MapEffect::Schedule(timer) => {
                    if !self.mounted {
                        continue;
                    }
                    let id = self.ctx.scheduler.schedule(timer.delay(), timer);
                    debug!(%id, ?timer, "scheduled timer");
                    self.timers.insert(id, timer);
                }
            }
        }
    }
}

impl Drop for MapScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}
