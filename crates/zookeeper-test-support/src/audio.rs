//! Test audio: records every playback request.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use zookeeper_core::audio::AudioOrchestrator;

/// One call made against [`RecordingAudio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    /// `play_background_music()`.
    BackgroundMusic,
    /// `play_instructions(id, force)`.
    Instructions {
        /// The instruction cue requested.
        id: String,
        /// Whether playback was forced.
        force: bool,
    },
}

/// An audio orchestrator whose readiness is toggled by the test.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    ready: AtomicBool,
    calls: Mutex<Vec<AudioCall>>,
}

impl RecordingAudio {
    /// Creates an orchestrator that is already ready.
    #[must_use]
    pub fn ready() -> Self {
        let audio = Self::default();
        audio.set_ready(true);
        audio
    }

    /// Creates an orchestrator that is still loading.
    #[must_use]
    pub fn loading() -> Self {
        Self::default()
    }

    /// Flips the readiness flag.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Returns a snapshot of all calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `play_instructions` calls made so far.
    pub fn instruction_plays(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, AudioCall::Instructions { .. }))
            .count()
    }

    /// Number of `play_background_music` calls made so far.
    pub fn music_plays(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, AudioCall::BackgroundMusic))
            .count()
    }
}

impl AudioOrchestrator for RecordingAudio {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn play_background_music(&self) {
        self.calls.lock().unwrap().push(AudioCall::BackgroundMusic);
    }

    fn play_instructions(&self, instruction_id: &str, force: bool) {
        self.calls.lock().unwrap().push(AudioCall::Instructions {
            id: instruction_id.to_owned(),
            force,
        });
    }
}
