//! Audio requests
//!
//! The engine never talks to an audio device. Gameplay code fires named sound
//! effects into an [`AudioSink`]; whatever owns the device drains them.

pub mod sound_manager;

pub use sound_manager::{SoundId, SoundManager, SoundRequest, MAX_PENDING_REQUESTS};

/// Fire-and-forget sound effect requests
pub trait AudioSink {
    /// Request playback of the sound effect registered as `name`
    fn play_sound_effect(&mut self, name: &str);
}

/// Sink that discards every request
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sound_effect(&mut self, name: &str) {
        log::trace!("Discarding sound effect '{}'", name);
    }
}
