//! Scripted input for the headless demo

use strafe_engine::prelude::*;

/// One thing the script does at a given frame
#[derive(Debug, Clone, Copy)]
pub enum Cue {
    /// Press or release a key
    Key(KeyCode, bool),
    /// Face a new yaw in degrees
    Turn(f32),
    /// Pause the scene
    Pause,
    /// Resume the scene
    Play,
    /// Reset and play again
    Reset,
}

/// Frame-indexed cues, sorted by frame
pub const SCRIPT: &[(u32, Cue)] = &[
    (90, Cue::Key(KeyCode::W, true)),
    (150, Cue::Key(KeyCode::D, true)),
    (200, Cue::Key(KeyCode::Space, true)),
    (201, Cue::Key(KeyCode::Space, false)),
    (215, Cue::Turn(30.0)),
    (260, Cue::Key(KeyCode::W, false)),
    (260, Cue::Key(KeyCode::D, false)),
    (300, Cue::Pause),
    (330, Cue::Play),
    (360, Cue::Reset),
];

/// Cues scheduled for `frame`
pub fn cues_at(frame: u32) -> impl Iterator<Item = Cue> {
    SCRIPT
        .iter()
        .filter(move |(at, _)| *at == frame)
        .map(|(_, cue)| *cue)
}
