//! Integration tests for the terminal shell.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use zookeeper_app::localization::{Catalog, Locale};
use zookeeper_app::shell::{Command, Shell, ShellDeps};
use zookeeper_core::flags::{FlagStore, FlagValue};
use zookeeper_core::navigation::NavigationRecord;
use zookeeper_core::scheduler::TimerId;
use zookeeper_flag_store::{FileFlagStore, MemoryFlagStore};
use zookeeper_games::domain::game::GameId;
use zookeeper_map::domain::onboarding::{MapTimer, OnboardingPhase};
use zookeeper_test_support::{ManualClock, ManualScheduler, RecordingAudio};

const NOW: i64 = 1_760_000_000_000;

struct Harness {
    clock: Arc<ManualClock>,
    settings: Arc<dyn FlagStore>,
    navigation: Arc<dyn FlagStore>,
    progress: Arc<dyn FlagStore>,
    audio: Arc<RecordingAudio>,
    scheduler: Arc<ManualScheduler<MapTimer>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_stores(
            Arc::new(MemoryFlagStore::new("app-settings")),
            Arc::new(MemoryFlagStore::new("navigation-state")),
            Arc::new(MemoryFlagStore::new("game-progress")),
        )
    }

    fn with_stores(
        settings: Arc<dyn FlagStore>,
        navigation: Arc<dyn FlagStore>,
        progress: Arc<dyn FlagStore>,
    ) -> Self {
        Self {
            clock: Arc::new(ManualClock::at_millis(NOW)),
            settings,
            navigation,
            progress,
            audio: Arc::new(RecordingAudio::ready()),
            scheduler: Arc::new(ManualScheduler::new()),
        }
    }

    fn shell(&self, locale: Locale) -> Shell<Vec<u8>> {
        let deps = ShellDeps {
            clock: self.clock.clone(),
            settings: self.settings.clone(),
            navigation: self.navigation.clone(),
            progress_store: self.progress.clone(),
            audio: self.audio.clone(),
            localizer: Arc::new(Catalog::for_locale(locale).unwrap()),
            scheduler: self.scheduler.clone(),
        };
        let mut shell = Shell::new(deps, Vec::new());
        shell.boot().unwrap();
        shell
    }

    fn advance(&self, shell: &mut Shell<Vec<u8>>, by: Duration) {
        for (id, _) in self.scheduler.advance(by) {
            shell.handle_timer(id).unwrap();
        }
    }

    /// Boots, dismisses the welcome and lets the reveal sequence finish.
    fn onboarded_shell(&self) -> Shell<Vec<u8>> {
        let mut shell = self.shell(Locale::En);
        send(&mut shell, "start");
        self.advance(&mut shell, Duration::from_millis(500));
        self.advance(&mut shell, Duration::from_millis(500));
        shell
    }
}

fn send(shell: &mut Shell<Vec<u8>>, line: &str) -> ControlFlow<()> {
    shell.handle_line(line).unwrap()
}

fn text(shell: &Shell<Vec<u8>>) -> String {
    String::from_utf8(shell.output().clone()).unwrap()
}

#[test]
fn test_command_parsing() {
    assert_eq!(Command::parse("start"), Some(Command::Start));
    assert_eq!(
        Command::parse("  play animalLabeling "),
        Some(Command::Play("animalLabeling".into()))
    );
    assert_eq!(Command::parse("play"), None);
    assert_eq!(Command::parse("start now"), None);
    assert_eq!(Command::parse("exit"), Some(Command::Quit));
    assert_eq!(Command::parse(""), None);
}

#[test]
fn test_boot_shows_splash_then_welcome_on_map() {
    let harness = Harness::new();

    let shell = harness.shell(Locale::En);

    let out = text(&shell);
    assert!(out.contains("Welcome to Zoo Keeper!"));
    assert!(out.contains("Welcome, young zoo keeper!"));
    assert!(out.contains("[ Start ▶️ ]"));
    assert_eq!(shell.current_route(), Some("/map"));
    let map = shell.map().unwrap();
    assert_eq!(map.phase(), OnboardingPhase::Welcome);
    assert!(map.navigation().came_from_splash);
    assert_eq!(
        NavigationRecord::load(harness.navigation.as_ref()).last_screen,
        "map"
    );
}

#[test]
fn test_hebrew_start_button_puts_arrow_first() {
    let harness = Harness::new();

    let shell = harness.shell(Locale::He);

    assert!(text(&shell).contains("[ ◀️  התחל ]"));
}

#[test]
fn test_start_then_reveal_plays_music_and_instructions() {
    // Arrange
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);

    // Act
    send(&mut shell, "start");
    let phase_after_start = shell.map().unwrap().phase();
    harness.advance(&mut shell, Duration::from_millis(500));
    harness.advance(&mut shell, Duration::from_millis(500));

    // Assert
    assert_eq!(phase_after_start, OnboardingPhase::Transitioning);
    assert_eq!(shell.map().unwrap().phase(), OnboardingPhase::MapActive);
    assert!(harness.settings.get_bool("hasShownWelcome"));
    assert_eq!(harness.audio.music_plays(), 1);
    assert_eq!(harness.audio.instruction_plays(), 1);
    assert!(text(&shell).contains("1. 🪧 Animal Labeling"));
}

#[test]
fn test_map_header_only_shows_with_map_content() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);
    let during_welcome = text(&shell);

    send(&mut shell, "start");
    harness.advance(&mut shell, Duration::from_millis(500));

    assert!(!during_welcome.contains("== Zoo Map =="));
    assert!(text(&shell).contains("== Zoo Map ==\nPick a stop to start playing"));
}

#[test]
fn test_unknown_route_falls_back_to_map() {
    let harness = Harness::new();
    let mut shell = harness.onboarded_shell();

    send(&mut shell, "play a/b");

    assert_eq!(shell.current_route(), Some("/map"));
    assert_eq!(shell.map().unwrap().phase(), OnboardingPhase::MapActive);
    assert!(text(&shell).contains("Nothing lives at that path."));
}

#[test]
fn test_locked_stop_stays_on_map() {
    let harness = Harness::new();
    let mut shell = harness.onboarded_shell();

    send(&mut shell, "play puzzleBuilder");

    assert_eq!(shell.current_route(), Some("/map"));
    assert!(text(&shell).contains("That stop is still locked."));
}

#[test]
fn test_completing_a_game_unlocks_next_stop_on_return() {
    // Arrange
    let harness = Harness::new();
    let mut shell = harness.onboarded_shell();

    // Act
    send(&mut shell, "play animalLabeling");
    let route_in_game = shell.current_route().map(str::to_owned);
    send(&mut shell, "complete");
    send(&mut shell, "back");

    // Assert
    assert_eq!(route_in_game.as_deref(), Some("/games/animalLabeling"));
    assert_eq!(shell.current_route(), Some("/map"));
    assert!(harness.progress.get_bool("animalLabeling.completed"));
    assert!(shell.progress().is_completed(GameId::AnimalLabeling));
    let map = shell.map().unwrap();
    assert!(map.navigation().returning_from_game);
    assert_eq!(map.phase(), OnboardingPhase::MapActive);
    assert!(!map.stops()[1].is_locked);
    assert!(map.stops()[2].is_locked);
    assert!(text(&shell).contains("Well done! Stop completed."));
}

#[test]
fn test_stops_cannot_be_tapped_behind_the_welcome() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);

    send(&mut shell, "play animalLabeling");

    assert_eq!(shell.current_route(), Some("/map"));
    assert!(text(&shell).contains("Press start first."));
}

#[test]
fn test_leaving_the_map_cancels_its_timers() {
    // Arrange
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);
    send(&mut shell, "start");
    harness.advance(&mut shell, Duration::from_millis(500));
    assert_eq!(harness.scheduler.pending_count(), 1);

    // Act
    send(&mut shell, "play animalLabeling");
    harness.advance(&mut shell, Duration::from_secs(5));

    // Assert
    assert_eq!(harness.scheduler.pending_count(), 0);
    assert_eq!(harness.scheduler.cancelled().len(), 1);
    assert_eq!(harness.audio.instruction_plays(), 0);
    assert!(shell.game().is_some());
}

#[test]
fn test_unowned_timer_is_ignored() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);
    let before = text(&shell);

    shell.handle_timer(TimerId(999)).unwrap();

    assert_eq!(text(&shell), before);
    assert_eq!(shell.map().unwrap().phase(), OnboardingPhase::Welcome);
}

#[test]
fn test_unknown_game_opens_placeholder_that_cannot_complete() {
    let harness = Harness::new();
    let mut shell = harness.onboarded_shell();

    send(&mut shell, "play dolphinShow");
    send(&mut shell, "complete");

    assert_eq!(shell.current_route(), Some("/games/dolphinShow"));
    assert_eq!(shell.game().unwrap().game(), None);
    let out = text(&shell);
    assert!(out.contains("This is a placeholder for the dolphinShow game."));
    assert!(out.contains("That only works inside a game."));
}

#[test]
fn test_map_commands_are_rejected_inside_a_game() {
    let harness = Harness::new();
    let mut shell = harness.onboarded_shell();
    send(&mut shell, "play animalLabeling");

    send(&mut shell, "instructions");

    assert!(text(&shell).contains("That only works on the map."));
    assert_eq!(harness.audio.instruction_plays(), 1);
}

#[test]
fn test_back_from_map_root_is_ignored() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);

    send(&mut shell, "back");

    assert_eq!(shell.current_route(), Some("/map"));
    assert_eq!(shell.map().unwrap().phase(), OnboardingPhase::Welcome);
}

#[test]
fn test_quit_unmounts_the_map() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);
    send(&mut shell, "start");

    let flow = send(&mut shell, "quit");

    assert!(flow.is_break());
    assert!(shell.map().is_none());
    assert_eq!(harness.scheduler.pending_count(), 0);
}

#[test]
fn test_unknown_command_prints_hint() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);

    send(&mut shell, "dance");

    assert!(text(&shell).contains("Unknown command."));
}

#[test]
fn test_boot_shows_welcome_even_after_it_was_shown() {
    let harness = Harness::new();
    harness
        .settings
        .set("hasShownWelcome", FlagValue::from(true))
        .unwrap();

    let shell = harness.shell(Locale::En);

    assert_eq!(shell.map().unwrap().phase(), OnboardingPhase::Welcome);
    assert!(text(&shell).contains("Welcome, young zoo keeper!"));
    assert_eq!(harness.audio.music_plays(), 0);
}

#[test]
fn test_flags_survive_restart_in_data_dir() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let open = |store: &str| -> Arc<dyn FlagStore> {
        Arc::new(FileFlagStore::open(dir.path(), store).unwrap())
    };
    let first = Harness::with_stores(
        open("app-settings"),
        open("navigation-state"),
        open("game-progress"),
    );
    let mut shell = first.onboarded_shell();
    send(&mut shell, "play animalLabeling");
    send(&mut shell, "complete");
    send(&mut shell, "quit");

    // Act
    let second = Harness::with_stores(
        open("app-settings"),
        open("navigation-state"),
        open("game-progress"),
    );
    let shell = second.shell(Locale::En);

    // Assert
    assert!(second.settings.get_bool("hasShownWelcome"));
    let map = shell.map().unwrap();
    assert_eq!(map.phase(), OnboardingPhase::Welcome);
    assert!(map.stops()[0].is_completed);
    assert!(!map.stops()[1].is_locked);
}

#[tokio::test]
async fn test_run_processes_input_until_quit() {
    let harness = Harness::new();
    let mut shell = harness.shell(Locale::En);
    let (_timer_tx, timers) = tokio::sync::mpsc::unbounded_channel();

    shell
        .run(&b"start\nhelp\nquit\nstart\n"[..], timers)
        .await
        .unwrap();

    let out = text(&shell);
    assert!(out.contains("> "));
    assert!(out.contains("commands: start"));
    assert!(harness.settings.get_bool("hasShownWelcome"));
    assert!(shell.map().is_none());
}
