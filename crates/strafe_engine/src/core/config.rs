//! # Unified Configuration System
//!
//! All configuration structures live here. Every section has sensible
//! defaults, so a partial file only overrides what it names.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging, fixed timestep, debug features
//! - **Physics Config**: Gravity and collider visualization
//! - **Character Config**: Movement tuning, ground probe, landing sound

use serde::{Serialize, Deserialize};

use crate::character::{MovementTuning, WishDirectionMode};
use crate::foundation::math::Vec3;

// Re-export from the old config module for compatibility
pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core engine behavior: logging, the physics tick, and debug features.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
    /// Seconds per physics tick
    pub fixed_timestep: f32,
    /// Physics ticks allowed per frame before the backlog is dropped
    pub max_physics_steps: u32,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_timestep: 1.0 / 60.0,
            max_physics_steps: 5,
            debug_mode: cfg!(debug_assertions),
        }
    }
    
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
    
    /// Set the physics tick length and per-frame cap
    pub fn with_fixed_timestep(mut self, step: f32, max_steps: u32) -> Self {
        self.fixed_timestep = step;
        self.max_physics_steps = max_steps;
        self
    }
    
    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
    
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(format!("Fixed timestep must be positive, got {}", self.fixed_timestep));
        }
        if self.max_physics_steps == 0 {
            return Err("Max physics steps must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Physics Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity applied to dynamic bodies
    pub gravity: Vec3,
    /// Draw wireframes for every collider
    pub debug_draw_colliders: bool,
}

impl PhysicsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.gravity.iter().any(|component| !component.is_finite()) {
            return Err(format!("Gravity must be finite, got {:?}", self.gravity));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            debug_draw_colliders: false,
        }
    }
}

/// # Character Configuration
///
/// Read once when a character controller is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Radius of the ground probe under the character's feet
    pub probe_distance: f32,
    /// Whether the landing sound plays
    pub sound_effects_enabled: bool,
    /// Sound id fired on landing
    pub landing_sound: String,
    /// Draw the ground probe as a wireframe sphere
    pub debug_draw_probe: bool,
    /// How movement input maps to world directions
    pub wish_mode: WishDirectionMode,
    /// Acceleration curve constants
    pub tuning: MovementTuning,
}

impl CharacterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.tuning.validate()?;
        if !(self.probe_distance.is_finite() && self.probe_distance > 0.0) {
            return Err(format!("Probe distance must be positive, got {}", self.probe_distance));
        }
        if self.sound_effects_enabled && self.landing_sound.is_empty() {
            return Err("Landing sound cannot be empty when sound effects are enabled".to_string());
        }
        Ok(())
    }
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            probe_distance: 0.25,
            sound_effects_enabled: true,
            landing_sound: "landing".to_string(),
            debug_draw_probe: false,
            wish_mode: WishDirectionMode::FacingRelative,
            tuning: MovementTuning::default(),
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Physics world configuration
    pub physics: PhysicsConfig,
    /// Player character configuration
    pub character: CharacterConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        self.physics.validate()?;
        self.character.validate()?;
        Ok(())
    }
    
    /// Load from file and validate in one go
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Config for ApplicationConfig {}
