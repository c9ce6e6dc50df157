//! Zoo Keeper terminal entry point.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use zookeeper_app::audio::SimulatedAudio;
use zookeeper_app::config::{AppConfig, LogFormat};
use zookeeper_app::localization::Catalog;
use zookeeper_app::scheduler::TokioScheduler;
use zookeeper_app::shell::{Shell, ShellDeps};
use zookeeper_core::clock::SystemClock;
use zookeeper_core::flags::{APP_SETTINGS_STORE, GAME_PROGRESS_STORE, NAVIGATION_STATE_STORE};
use zookeeper_flag_store::FileFlagStore;
use zookeeper_map::domain::onboarding::MapTimer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;

    // Logs go to stderr so they do not interleave with the screens.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        locale = ?config.locale,
        "starting Zoo Keeper"
    );

    let settings = FileFlagStore::open(&config.data_dir, APP_SETTINGS_STORE)?;
    let navigation = FileFlagStore::open(&config.data_dir, NAVIGATION_STATE_STORE)?;
    let progress = FileFlagStore::open(&config.data_dir, GAME_PROGRESS_STORE)?;
    let (scheduler, timers) = TokioScheduler::<MapTimer>::channel();

    let deps = ShellDeps {
        clock: Arc::new(SystemClock),
        settings: Arc::new(settings),
        navigation: Arc::new(navigation),
        progress_store: Arc::new(progress),
        audio: Arc::new(SimulatedAudio::new(config.audio_warmup)),
        localizer: Arc::new(Catalog::for_locale(config.locale)?),
        scheduler: Arc::new(scheduler),
    };

    let mut shell = Shell::new(deps, std::io::stdout());
    shell.boot()?;
    shell.run(tokio::io::stdin(), timers).await?;

    Ok(())
}
