//! Simulated audio orchestrator.
//!
//! There is no sound device in the terminal: playback is logged, and the
//! orchestrator pretends to load for a configurable warm-up so screens see
//! readiness flip after they mount.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use zookeeper_core::audio::AudioOrchestrator;

/// Logs playback instead of producing sound.
#[derive(Debug)]
pub struct SimulatedAudio {
    ready_at: Instant,
    music_playing: AtomicBool,
}

impl SimulatedAudio {
    /// Creates an orchestrator that becomes ready after `warmup`.
    #[must_use]
    pub fn new(warmup: Duration) -> Self {
        Self {
            ready_at: Instant::now() + warmup,
            music_playing: AtomicBool::new(false),
        }
    }

    /// Whether the background loop has been started.
    pub fn is_music_playing(&self) -> bool {
        self.music_playing.load(Ordering::SeqCst)
    }
}

impl AudioOrchestrator for SimulatedAudio {
    fn is_ready(&self) -> bool {
        Instant::now() >= self.ready_at
    }

    fn play_background_music(&self) {
        if self.music_playing.swap(true, Ordering::SeqCst) {
            debug!("background music already playing");
        } else {
            info!("background music started");
        }
    }

    fn play_instructions(&self, instruction_id: &str, force: bool) {
        info!(instruction_id, force, "playing instructions");
    }
}
