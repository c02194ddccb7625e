//! Sound effect registry and request queue
//!
//! Sounds must be registered before they can be requested. Requests are
//! queued until the audio device drains them once per frame. A host that
//! never drains keeps only the newest [`MAX_PENDING_REQUESTS`].

use std::collections::HashMap;
use super::AudioSink;

/// Queue length past which the oldest requests are dropped
pub const MAX_PENDING_REQUESTS: usize = 64;

/// Unique identifier for a sound
pub type SoundId = String;

/// A queued playback request
#[derive(Debug, Clone, PartialEq)]
pub struct SoundRequest {
    /// Sound to play
    pub id: SoundId,
    /// Volume in `0.0..=1.0`
    pub volume: f32,
}

/// Sound asset manager
pub struct SoundManager {
    registered: HashMap<SoundId, f32>,
    pending: Vec<SoundRequest>,
    muted: bool,
}

impl SoundManager {
    /// Create a new sound manager
    pub fn new() -> Self {
        Self {
            registered: HashMap::new(),
            pending: Vec::new(),
            muted: false,
        }
    }
    
    /// Register a sound id with its default volume
    pub fn register(&mut self, id: impl Into<SoundId>, volume: f32) {
        let id = id.into();
        log::debug!("Registered sound '{}'", id);
        self.registered.insert(id, volume.clamp(0.0, 1.0));
    }
    
    /// Check if a sound is registered
    pub fn is_loaded(&self, sound_id: &str) -> bool {
        self.registered.contains_key(sound_id)
    }
    
    /// Silence or restore all requests
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
    
    /// Requests waiting for the device
    pub fn pending(&self) -> &[SoundRequest] {
        &self.pending
    }
    
    /// Hand every queued request to the device
    pub fn drain(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.pending)
    }
}

impl AudioSink for SoundManager {
    fn play_sound_effect(&mut self, name: &str) {
        let Some(volume) = self.registered.get(name).copied() else {
            log::warn!("Sound effect '{}' is not registered, dropping request", name);
            return;
        };
        if self.muted {
            return;
        }
        if self.pending.len() >= MAX_PENDING_REQUESTS {
            let dropped = self.pending.remove(0);
            log::warn!("Sound queue full, dropping oldest request '{}'", dropped.id);
        }
        self.pending.push(SoundRequest {
            id: name.to_string(),
            volume,
        });
    }
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::new()
    }
}
