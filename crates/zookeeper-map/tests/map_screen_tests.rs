//! Integration tests for the map screen handler.

use std::sync::Arc;
use std::time::Duration;

use zookeeper_core::flags::{FlagStore, FlagValue};
use zookeeper_core::navigation::{NavigationRecord, record_screen_entry};
use zookeeper_flag_store::MemoryFlagStore;
use zookeeper_games::domain::game::GameId;
use zookeeper_games::domain::progress::GameProgress;
use zookeeper_map::application::map_screen::{MapContext, MapScreen};
use zookeeper_map::domain::onboarding::{MapTimer, OnboardingPhase};
use zookeeper_test_support::{
    AudioCall, FailingFlagStore, KeyLocalizer, ManualClock, ManualScheduler, RecordingAudio,
    RecordingRouter, RouteCall,
};

const NOW: i64 = 1_760_000_000_000;

struct Harness {
    clock: Arc<ManualClock>,
    settings: Arc<MemoryFlagStore>,
    navigation: Arc<MemoryFlagStore>,
    audio: Arc<RecordingAudio>,
    router: Arc<RecordingRouter>,
    scheduler: Arc<ManualScheduler<MapTimer>>,
}

impl Harness {
    fn new(audio: RecordingAudio) -> Self {
        Self {
            clock: Arc::new(ManualClock::at_millis(NOW)),
            settings: Arc::new(MemoryFlagStore::new("app-settings")),
            navigation: Arc::new(MemoryFlagStore::new("navigation-state")),
            audio: Arc::new(audio),
            router: Arc::new(RecordingRouter::default()),
            scheduler: Arc::new(ManualScheduler::new()),
        }
    }

    fn returning_player(audio: RecordingAudio) -> Self {
        let harness = Self::new(audio);
        harness
            .settings
            .set("hasShownWelcome", FlagValue::from(true))
            .unwrap();
        harness
    }

    fn context(&self) -> MapContext {
        MapContext {
            clock: self.clock.clone(),
            settings: self.settings.clone(),
            navigation: self.navigation.clone(),
            audio: self.audio.clone(),
            router: self.router.clone(),
            localizer: Arc::new(KeyLocalizer::default()),
            scheduler: self.scheduler.clone(),
        }
    }

    fn last_screen_was(&self, screen: &str, millis_ago: i64) {
        record_screen_entry(self.navigation.as_ref(), screen, NOW - millis_ago).unwrap();
    }

    fn mount(&self) -> MapScreen {
        MapScreen::mount(self.context(), &GameProgress::default())
    }

    /// Fires every timer due within `by`, in order, against `screen`.
    fn advance(&self, screen: &mut MapScreen, by: Duration) {
        for (id, _) in self.scheduler.advance(by) {
            screen.on_timer(id);
        }
    }
}

fn instructions() -> AudioCall {
    AudioCall::Instructions {
        id: "map1heb".to_owned(),
        force: true,
    }
}

#[test]
fn test_fresh_install_shows_welcome() {
    let harness = Harness::new(RecordingAudio::ready());

    let screen = harness.mount();

    let state = screen.state();
    assert!(state.show_welcome);
    assert!(!state.show_map_content);
    assert!(harness.audio.calls().is_empty());
}

#[test]
fn test_mount_records_map_entry_after_classifying() {
    // Arrange
    let harness = Harness::returning_player(RecordingAudio::ready());
    harness.last_screen_was("index", 500);

    // Act
    let screen = harness.mount();

    // Assert
    assert!(screen.navigation().came_from_splash);
    assert_eq!(
        NavigationRecord::load(harness.navigation.as_ref()),
        NavigationRecord {
            last_screen: "map".to_owned(),
            last_navigation_time: NOW,
        }
    );
}

#[test]
fn test_splash_arrival_shows_welcome_for_returning_player() {
    let harness = Harness::returning_player(RecordingAudio::ready());
    harness.last_screen_was("index", 500);

    let screen = harness.mount();

    assert_eq!(screen.phase(), OnboardingPhase::Welcome);
    assert!(harness.audio.calls().is_empty());
}

#[test]
fn test_start_sequence_reveals_map_then_music_then_instructions() {
    // Arrange
    let harness = Harness::new(RecordingAudio::ready());
    let mut screen = harness.mount();

    // Act / Assert: start
    assert!(screen.start());
    assert_eq!(screen.phase(), OnboardingPhase::Transitioning);
    assert!(harness.settings.get_bool("hasShownWelcome"));
    assert!(harness.audio.calls().is_empty());

    // 499ms: nothing yet
    harness.advance(&mut screen, Duration::from_millis(499));
    assert_eq!(screen.phase(), OnboardingPhase::Transitioning);

    // 500ms: map revealed and music started
    harness.advance(&mut screen, Duration::from_millis(1));
    assert_eq!(screen.phase(), OnboardingPhase::MapActive);
    assert_eq!(harness.audio.calls(), vec![AudioCall::BackgroundMusic]);

    // 1000ms: instructions
    harness.advance(&mut screen, Duration::from_millis(500));
    assert_eq!(
        harness.audio.calls(),
        vec![AudioCall::BackgroundMusic, instructions()]
    );
    assert!(screen.state().instructions_played);
    assert_eq!(screen.pending_timers(), 0);
}

#[test]
fn test_welcome_flag_persists_across_visits() {
    // Arrange
    let harness = Harness::new(RecordingAudio::ready());
    let mut first = harness.mount();
    first.start();
    drop(first);

    // Act
    harness.clock.advance_millis(60_000);
    let second = harness.mount();

    // Assert
    assert!(harness.settings.get_bool("hasShownWelcome"));
    assert_eq!(second.phase(), OnboardingPhase::MapActive);
}

#[test]
fn test_returning_from_game_plays_music_without_instructions() {
    // Arrange
    let harness = Harness::returning_player(RecordingAudio::ready());
    harness.last_screen_was("games/puzzleBuilder", 5_000);

    // Act
    let mut screen = harness.mount();
    harness.advance(&mut screen, Duration::from_secs(5));

    // Assert
    assert!(screen.navigation().returning_from_game);
    assert_eq!(screen.phase(), OnboardingPhase::MapActive);
    assert_eq!(harness.audio.calls(), vec![AudioCall::BackgroundMusic]);
}

#[test]
fn test_audio_ready_after_mount_starts_music_exactly_once() {
    // Arrange
    let harness = Harness::returning_player(RecordingAudio::loading());
    let mut screen = harness.mount();
    assert!(harness.audio.calls().is_empty());

    // Act
    harness.audio.set_ready(true);
    screen.poll_audio();
    screen.poll_audio();

    // Assert
    assert_eq!(harness.audio.music_plays(), 1);
    assert_eq!(harness.audio.instruction_plays(), 0);
}

#[test]
fn test_unmount_cancels_pending_timers() {
    // Arrange
    let harness = Harness::new(RecordingAudio::ready());
    let mut screen = harness.mount();
    screen.start();
    assert_eq!(screen.pending_timers(), 1);

    // Act
    screen.unmount();

    // Assert
    assert_eq!(screen.pending_timers(), 0);
    assert_eq!(harness.scheduler.cancelled().len(), 1);
    assert_eq!(harness.scheduler.pending_count(), 0);
    assert_eq!(screen.phase(), OnboardingPhase::Transitioning);
}

#[test]
fn test_timer_delivered_after_unmount_is_suppressed() {
    // Arrange
    let harness = Harness::new(RecordingAudio::ready());
    let mut screen = harness.mount();
    screen.start();
    let (id, _) = harness.scheduler.fire_next().unwrap();
    screen.unmount();

    // Act
    let delivered = screen.on_timer(id);

    // Assert
    assert!(!delivered);
    assert_eq!(screen.phase(), OnboardingPhase::Transitioning);
    assert!(harness.audio.calls().is_empty());
}

#[test]
fn test_dropping_screen_cancels_timers() {
    let harness = Harness::new(RecordingAudio::ready());
    let mut screen = harness.mount();
    screen.start();

    drop(screen);

    assert_eq!(harness.scheduler.pending_count(), 0);
    assert_eq!(harness.scheduler.cancelled().len(), 1);
}

#[test]
fn test_storage_failures_do_not_escape() {
    // Arrange
    let harness = Harness::new(RecordingAudio::ready());
    let mut ctx = harness.context();
    ctx.settings = Arc::new(FailingFlagStore);
    ctx.navigation = Arc::new(FailingFlagStore);

    // Act
    let mut screen = MapScreen::mount(ctx, &GameProgress::default());
    let accepted = screen.start();
    harness.advance(&mut screen, Duration::from_millis(500));

    // Assert
    assert!(accepted);
    assert_eq!(screen.phase(), OnboardingPhase::MapActive);
}

#[test]
fn test_select_unlocked_game_pushes_route_and_locked_is_noop() {
    // Arrange
    let harness = Harness::returning_player(RecordingAudio::ready());
    let screen = harness.mount();

    // Act
    let opened = screen.select_game(GameId::AnimalLabeling);
    let locked = screen.select_game(GameId::PuzzleBuilder);

    // Assert
    assert!(opened);
    assert!(!locked);
    assert_eq!(
        harness.router.calls(),
        vec![RouteCall::Push("/games/animalLabeling".to_owned())]
    );
}

#[test]
fn test_refresh_progress_unlocks_next_stop() {
    // Arrange
    let harness = Harness::returning_player(RecordingAudio::ready());
    let mut screen = harness.mount();

    // Act
    screen.refresh_progress(&GameProgress::with_completed(&[GameId::AnimalLabeling]));

    // Assert
    let locks: Vec<bool> = screen.stops().iter().map(|stop| stop.is_locked).collect();
    assert_eq!(locks, vec![false, false, true]);
    assert!(screen.select_game(GameId::PuzzleBuilder));
}

#[test]
fn test_instructions_button_replays_only_once_map_is_showing() {
    let harness = Harness::new(RecordingAudio::ready());
    let mut screen = harness.mount();

    assert!(!screen.request_instructions());

    screen.start();
    harness.advance(&mut screen, Duration::from_millis(500));
    assert!(screen.request_instructions());
    assert_eq!(
        harness.audio.calls(),
        vec![AudioCall::BackgroundMusic, instructions()]
    );
}

#[test]
fn test_reveal_rereads_audio_that_became_ready_between_polls() {
    // Arrange
    let harness = Harness::new(RecordingAudio::loading());
    let mut screen = harness.mount();
    screen.start();
    harness.audio.set_ready(true);

    // Act
    harness.advance(&mut screen, Duration::from_millis(500));
    let after_reveal = harness.audio.calls();
    harness.advance(&mut screen, Duration::from_millis(500));

    // Assert
    assert_eq!(after_reveal, vec![AudioCall::BackgroundMusic]);
    assert_eq!(
        harness.audio.calls(),
        vec![AudioCall::BackgroundMusic, instructions()]
    );
    assert!(screen.state().instructions_played);
}

#[test]
fn test_stops_cannot_be_selected_while_hidden() {
    let harness = Harness::new(RecordingAudio::ready());
    let mut screen = harness.mount();

    let during_welcome = screen.select_game(GameId::AnimalLabeling);
    screen.start();
    let during_transition = screen.select_game(GameId::AnimalLabeling);

    assert!(!during_welcome);
    assert!(!during_transition);
    assert!(harness.router.calls().is_empty());
}

#[test]
fn test_each_visit_gets_its_own_visit_id() {
    let harness = Harness::returning_player(RecordingAudio::ready());

    let first = harness.mount();
    let second = harness.mount();

    assert_ne!(first.visit_id(), second.visit_id());
}
