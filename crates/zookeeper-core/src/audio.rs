//! Audio orchestrator contract consumed by screens.

/// Background music and instruction playback.
///
/// Readiness is polled: screens read [`AudioOrchestrator::is_ready`] and
/// must tolerate it flipping from `false` to `true` after they mount.
pub trait AudioOrchestrator: Send + Sync {
    /// Whether sounds have finished loading.
    fn is_ready(&self) -> bool;

    /// Starts the background loop. Safe to call when already playing.
    fn play_background_music(&self);

    /// Plays the one-shot instruction cue `instruction_id`.
    ///
    /// `force` plays the cue even if it was already played recently.
    fn play_instructions(&self, instruction_id: &str, force: bool);
}
