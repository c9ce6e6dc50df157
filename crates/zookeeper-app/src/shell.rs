//! Line-oriented host for the splash, map and game screens.
//!
//! The shell owns the route stack and the mounted screen. Screens only
//! queue route requests; the shell drains them after each event, dropping
//! the old screen before mounting the next one.

use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, info_span, warn};
use zookeeper_core::audio::AudioOrchestrator;
use zookeeper_core::clock::Clock;
use zookeeper_core::error::DomainError;
use zookeeper_core::flags::FlagStore;
use zookeeper_core::localization::Localizer;
use zookeeper_core::navigation::{SPLASH_SCREEN, record_screen_entry};
use zookeeper_core::router::Router;
use zookeeper_core::scheduler::{Scheduler, TimerId};
use zookeeper_games::application::game_screen::GameScreen;
use zookeeper_games::domain::game::GameId;
use zookeeper_games::domain::progress::GameProgress;
use zookeeper_map::application::map_screen::{MapContext, MapScreen};
use zookeeper_map::domain::onboarding::MapTimer;

use crate::error::AppError;
use crate::router::{ChannelRouter, MAP_ROUTE, RouteRequest};
use crate::scheduler::TimerReceiver;

/// How often the shell re-reads audio readiness while idle.
pub const AUDIO_POLL_INTERVAL: Duration = Duration::from_millis(100);

const SPLASH_ROUTE: &str = "/";
const GAME_ROUTE_PREFIX: &str = "/games/";

/// Collaborators shared by every screen the shell mounts.
#[derive(Clone)]
pub struct ShellDeps {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// The `app-settings` store.
    pub settings: Arc<dyn FlagStore>,
    /// The `navigation-state` store.
    pub navigation: Arc<dyn FlagStore>,
    /// The `game-progress` store.
    pub progress_store: Arc<dyn FlagStore>,
    /// Background music and instruction playback.
    pub audio: Arc<dyn AudioOrchestrator>,
    /// String lookup.
    pub localizer: Arc<dyn Localizer>,
    /// Timer source for the map's onboarding delays.
    pub scheduler: Arc<dyn Scheduler<MapTimer>>,
}

/// A command typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Press the welcome's start button.
    Start,
    /// Tap the stop for a game id, known or not.
    Play(String),
    /// Press the instructions button.
    Instructions,
    /// Finish the open game.
    Complete,
    /// Go back one screen.
    Back,
    /// List the map's stops.
    Stops,
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines and unknown words yield `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("start", None) => Self::Start,
            ("play", Some(game)) => Self::Play(game.to_owned()),
            ("instructions", None) => Self::Instructions,
            ("complete", None) => Self::Complete,
            ("back", None) => Self::Back,
            ("stops", None) => Self::Stops,
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => return None,
        };
        words.next().is_none().then_some(command)
    }
}

enum ActiveScreen {
    Map(MapScreen),
    Game(GameScreen),
}

/// The terminal shell.
pub struct Shell<W> {
    deps: ShellDeps,
    router: Arc<ChannelRouter>,
    routes: UnboundedReceiver<RouteRequest>,
    stack: Vec<String>,
    active: Option<ActiveScreen>,
    progress: GameProgress,
    out: W,
}

impl<W: Write> Shell<W> {
    /// Creates a shell that writes its screens to `out`.
    pub fn new(deps: ShellDeps, out: W) -> Self {
        let (router, routes) = ChannelRouter::channel();
        let progress = GameProgress::load(deps.progress_store.as_ref());
        Self {
            deps,
            router: Arc::new(router),
            routes,
            stack: Vec::new(),
            active: None,
            progress,
            out,
        }
    }

    /// Shows the splash screen and redirects to the map.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the output cannot be written.
    pub fn boot(&mut self) -> Result<(), AppError> {
        {
            let _span = info_span!("splash_screen").entered();
            let now = self.deps.clock.now_millis();
            if let Err(e) = record_screen_entry(self.deps.navigation.as_ref(), SPLASH_SCREEN, now) {
                warn!(error = %e, "failed to record splash entry");
            }
            info!("splash shown");
        }
        let t = Arc::clone(&self.deps.localizer);
        writeln!(self.out, "{}", t.t("splash.title"))?;
        writeln!(self.out, "{}", t.t("splash.subtitle"))?;
        self.stack.push(SPLASH_ROUTE.to_owned());
        self.router.redirect(MAP_ROUTE);
        self.process_routes()
    }

    /// Handles one input line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the output cannot be written.
    pub fn handle_line(&mut self, line: &str) -> Result<ControlFlow<()>, AppError> {
        if line.trim().is_empty() {
            return Ok(ControlFlow::Continue(()));
        }
        let Some(command) = Command::parse(line) else {
            self.say("shell.unknownCommand")?;
            return Ok(ControlFlow::Continue(()));
        };
        debug!(?command, "command received");
        match command {
            Command::Quit => {
                self.shutdown();
                return Ok(ControlFlow::Break(()));
            }
            Command::Help => self.say("shell.help")?,
            Command::Start => match &mut self.active {
                Some(ActiveScreen::Map(map)) => {
                    if map.start() {
                        self.render()?;
                    }
                }
                _ => self.say("shell.notOnMap")?,
            },
            Command::Play(raw) => self.play(&raw)?,
            Command::Instructions => match &mut self.active {
                Some(ActiveScreen::Map(map)) => {
                    map.request_instructions();
                }
                _ => self.say("shell.notOnMap")?,
            },
            Command::Complete => self.complete()?,
            Command::Back => match &self.active {
                Some(ActiveScreen::Game(game)) => game.back(),
                _ => self.router.back(),
            },
            Command::Stops => {
                if matches!(self.active, Some(ActiveScreen::Map(_))) {
                    self.render_stops()?;
                } else {
                    self.say("shell.notOnMap")?;
                }
            }
        }
        self.process_routes()?;
        Ok(ControlFlow::Continue(()))
    }

    /// Delivers a fired timer to the mounted screen.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the output cannot be written.
    pub fn handle_timer(&mut self, id: TimerId) -> Result<(), AppError> {
        let Some(ActiveScreen::Map(map)) = &mut self.active else {
            debug!(%id, "timer arrived with no map mounted");
            return Ok(());
        };
        let before = map.state();
        if map.on_timer(id) && map.state() != before {
            self.render()?;
        }
        self.process_routes()
    }

    /// Re-reads audio readiness on the mounted map.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the output cannot be written.
    pub fn tick(&mut self) -> Result<(), AppError> {
        if let Some(ActiveScreen::Map(map)) = &mut self.active {
            map.poll_audio();
        }
        self.process_routes()
    }

    /// Runs the event loop until `quit` or the end of `input`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if input cannot be read or output written.
    pub async fn run<R>(
        &mut self,
        input: R,
        mut timers: TimerReceiver<MapTimer>,
    ) -> Result<(), AppError>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(input).lines();
        let mut audio_poll = tokio::time::interval(AUDIO_POLL_INTERVAL);
        audio_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.prompt()?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line)?.is_break() {
                        break;
                    }
                    self.prompt()?;
                }
                Some((id, _timer)) = timers.recv() => self.handle_timer(id)?,
                _ = audio_poll.tick() => self.tick()?,
            }
        }
        self.shutdown();
        info!("shell stopped");
        Ok(())
    }

    /// The route of the mounted screen.
    #[must_use]
    pub fn current_route(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// The mounted map, if any.
    #[must_use]
    pub fn map(&self) -> Option<&MapScreen> {
        match &self.active {
            Some(ActiveScreen::Map(map)) => Some(map),
            _ => None,
        }
    }

    /// The mounted game screen, if any.
    #[must_use]
    pub fn game(&self) -> Option<&GameScreen> {
        match &self.active {
            Some(ActiveScreen::Game(game)) => Some(game),
            _ => None,
        }
    }

    /// Completion flags as the shell last saw them.
    #[must_use]
    pub fn progress(&self) -> GameProgress {
        self.progress
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn play(&mut self, raw: &str) -> Result<(), AppError> {
        let Some(ActiveScreen::Map(map)) = &self.active else {
            return self.say("shell.notOnMap");
        };
        if !map.state().show_map_content {
            return self.say("shell.mapHidden");
        }
        match raw.parse::<GameId>() {
            Ok(game) => {
                if !map.select_game(game) {
                    self.say("shell.lockedStop")?;
                }
            }
            Err(_) => {
                // Uncatalogued ids open the placeholder, like a deep link.
                info!(raw_id = raw, "opening uncatalogued game");
                self.router.push(&format!("{GAME_ROUTE_PREFIX}{raw}"));
            }
        }
        Ok(())
    }

    fn complete(&mut self) -> Result<(), AppError> {
        let Some(ActiveScreen::Game(game)) = &self.active else {
            return self.say("shell.notInGame");
        };
        match game.complete(&mut self.progress, self.deps.progress_store.as_ref()) {
            Ok(()) => self.say("shell.completed"),
            Err(DomainError::UnknownGame(raw)) => {
                debug!(raw_id = %raw, "placeholder game cannot be completed");
                self.say("shell.notInGame")
            }
            Err(e) => {
                warn!(error = %e, "failed to save progress");
                self.say("shell.completeFailed")
            }
        }
    }

    fn process_routes(&mut self) -> Result<(), AppError> {
        loop {
            let Ok(request) = self.routes.try_recv() else {
                return Ok(());
            };
            debug!(?request, stack = ?self.stack, "applying route");
            match request {
                RouteRequest::Push(path) => self.stack.push(path),
                RouteRequest::Redirect(path) => {
                    self.stack.pop();
                    self.stack.push(path);
                }
                RouteRequest::Back => {
                    if self.stack.len() < 2 {
                        debug!("nothing to go back to");
                        continue;
                    }
                    self.stack.pop();
                }
            }
            self.mount_top()?;
        }
    }

    /// Mounts the screen at the top of the stack, popping routes that
    /// resolve to nothing.
    fn mount_top(&mut self) -> Result<(), AppError> {
        // The old screen goes first so its timers are cancelled before the
        // next screen records its entry.
        self.active = None;
        while let Some(path) = self.stack.last().cloned() {
            if let Some(screen) = self.resolve(&path) {
                self.active = Some(screen);
                return self.render();
            }
            warn!(path = %path, "unknown route");
            self.say("shell.unknownRoute")?;
            self.stack.pop();
        }
        Ok(())
    }

    fn resolve(&mut self, path: &str) -> Option<ActiveScreen> {
        if path == MAP_ROUTE {
            self.progress = GameProgress::load(self.deps.progress_store.as_ref());
            let ctx = MapContext {
                clock: Arc::clone(&self.deps.clock),
                settings: Arc::clone(&self.deps.settings),
                navigation: Arc::clone(&self.deps.navigation),
                audio: Arc::clone(&self.deps.audio),
                router: self.router.clone(),
                localizer: Arc::clone(&self.deps.localizer),
                scheduler: Arc::clone(&self.deps.scheduler),
            };
            return Some(ActiveScreen::Map(MapScreen::mount(ctx, &self.progress)));
        }
        let raw = path.strip_prefix(GAME_ROUTE_PREFIX)?;
        if raw.is_empty() || raw.contains('/') {
            return None;
        }
        Some(ActiveScreen::Game(GameScreen::mount(
            raw,
            self.deps.navigation.as_ref(),
            self.deps.clock.as_ref(),
            self.router.clone(),
        )))
    }

    fn render(&mut self) -> Result<(), AppError> {
        let t = Arc::clone(&self.deps.localizer);
        match &self.active {
            Some(ActiveScreen::Map(map)) => {
                let state = map.state();
                writeln!(self.out)?;
                if state.show_welcome {
                    let start = if t.is_rtl() {
                        format!("◀️  {}", t.t("common.start"))
                    } else {
                        format!("{} ▶️", t.t("common.start"))
                    };
                    writeln!(self.out, "  {}", t.t("map.welcomeTitle"))?;
                    writeln!(self.out, "  {}", t.t("map.welcomeSubtitle"))?;
                    writeln!(self.out, "  [ {start} ]")?;
                }
                if state.show_map_content {
                    writeln!(self.out, "== {} ==", t.t("map.title"))?;
                    writeln!(self.out, "{}", t.t("map.subtitle"))?;
                    self.render_stops()?;
                }
            }
            Some(ActiveScreen::Game(game)) => {
                let view = game.view(t.as_ref());
                let slots: String = view.letter_slots.iter().map(|_| "_ ").collect();
                writeln!(self.out)?;
                writeln!(self.out, "< {} | {}", t.t("shell.gameHeader"), view.header)?;
                writeln!(self.out, "== {} ==", view.title)?;
                writeln!(self.out, "{}", view.instructions)?;
                writeln!(self.out, "{}", slots.trim_end())?;
            }
            None => {}
        }
        Ok(())
    }

    fn render_stops(&mut self) -> Result<(), AppError> {
        let t = Arc::clone(&self.deps.localizer);
        let Some(ActiveScreen::Map(map)) = &self.active else {
            return Ok(());
        };
        for stop in map.stops() {
            let marker = if stop.is_locked {
                format!(" ({})", t.t("map.locked"))
            } else if stop.is_completed {
                format!(" ({})", t.t("map.completed"))
            } else {
                String::new()
            };
            writeln!(
                self.out,
                "  {}. {} {}{marker}  [{}]",
                stop.order + 1,
                stop.emoji,
                stop.title,
                stop.id
            )?;
        }
        Ok(())
    }

    fn say(&mut self, key: &str) -> Result<(), AppError> {
        writeln!(self.out, "{}", self.deps.localizer.t(key))?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), AppError> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.active = None;
        self.stack.clear();
    }
}
